//! Rule router: turns fast-signal risk plus the rule catalog into an
//! ordered execution plan.
//!
//! The router never executes a rule. It computes the aggregate risk, writes
//! it back into the file metadata, filters the applicable rules by risk and
//! cost policy, orders the survivors cheapest tier first, and hands the
//! resulting [`RuleExecutionPlan`] to an external executor. That executor is
//! expected to consult [`RuleRouter::should_terminate_early`] between rules
//! and may skip the remaining lower-priority entries once its running risk
//! estimate crosses the plan's threshold — the contract is advisory, not
//! preemptive.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::Frame;

use crate::canonicalize::{FileKind, FileMetadata};
use crate::registry::{RuleCost, RuleRegistry};
use crate::signals::{self, SignalEngine};

// ── Configuration ───────────────────────────────────────────────────

/// Tunable constants for plan construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Floor applied to the aggregate risk so some rule always executes.
    pub base_risk: f64,
    /// Below this risk, expensive rules are dropped for non-financial
    /// files. Also echoed on the plan as its informational risk threshold.
    pub low_risk_threshold: f64,
    /// Above this risk, the stricter early-termination threshold applies.
    pub elevated_risk_threshold: f64,
    pub standard_termination_threshold: f64,
    pub elevated_termination_threshold: f64,
    /// Estimated per-rule execution time by cost tier, in milliseconds.
    pub cheap_cost_ms: f64,
    pub medium_cost_ms: f64,
    pub expensive_cost_ms: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            base_risk: 0.1,
            low_risk_threshold: 0.3,
            elevated_risk_threshold: 0.7,
            standard_termination_threshold: 0.8,
            elevated_termination_threshold: 0.9,
            cheap_cost_ms: 10.0,
            medium_cost_ms: 100.0,
            expensive_cost_ms: 1000.0,
        }
    }
}

impl RouterConfig {
    fn cost_ms(&self, cost: RuleCost) -> f64 {
        match cost {
            RuleCost::Cheap => self.cheap_cost_ms,
            RuleCost::Medium => self.medium_cost_ms,
            RuleCost::Expensive => self.expensive_cost_ms,
        }
    }
}

// ── Execution plan ──────────────────────────────────────────────────

/// Ordered, filtered schedule of rule names plus cost and termination
/// metadata, handed to the external executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleExecutionPlan {
    /// The authoritative schedule.
    pub rules_to_execute: Vec<String>,
    /// Sum of per-tier unit costs over the schedule, in milliseconds.
    pub estimated_cost: f64,
    /// Informational risk floor; not used for filtering.
    pub risk_threshold: f64,
    /// Aggregate-risk level above which the executor may stop early.
    pub early_termination_threshold: f64,
    /// Identical to `rules_to_execute`; kept for explicit intent at the
    /// API boundary.
    pub execution_order: Vec<String>,
}

/// Diagnostic summary of a plan, shaped for an operational endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_rules: usize,
    pub estimated_total_time_ms: f64,
    pub rule_breakdown: IndexMap<String, RuleBreakdown>,
    pub early_termination_threshold: f64,
}

/// Per-rule slice of a [`PlanSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBreakdown {
    pub category: String,
    pub cost: String,
    pub priority: u8,
    pub estimated_time_ms: f64,
}

// ── Router ──────────────────────────────────────────────────────────

/// Orchestrates signal evaluation, predicate filtering, risk/cost policy,
/// and ordering into an execution plan.
///
/// Construct once with an immutable registry and engine and share freely;
/// planning takes `&self` and all per-call state lives in the arguments.
pub struct RuleRouter {
    registry: RuleRegistry,
    engine: SignalEngine,
    config: RouterConfig,
}

impl RuleRouter {
    pub fn new(registry: RuleRegistry, engine: SignalEngine) -> RuleRouter {
        Self::with_config(registry, engine, RouterConfig::default())
    }

    pub fn with_config(
        registry: RuleRegistry,
        engine: SignalEngine,
        config: RouterConfig,
    ) -> RuleRouter {
        RuleRouter {
            registry,
            engine,
            config,
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Build an execution plan for the frame, evaluated at `Utc::now()`.
    ///
    /// Writes the floored aggregate risk back into `metadata.risk_score`.
    pub fn create_execution_plan(
        &self,
        frame: &Frame,
        metadata: &mut FileMetadata,
    ) -> RuleExecutionPlan {
        self.create_execution_plan_at(frame, metadata, Utc::now())
    }

    /// Build an execution plan at an explicit instant.
    pub fn create_execution_plan_at(
        &self,
        frame: &Frame,
        metadata: &mut FileMetadata,
        now: DateTime<Utc>,
    ) -> RuleExecutionPlan {
        let fast_signals = self.engine.calculate_all_signals_at(frame, metadata, now);
        let aggregate_risk =
            signals::aggregate_risk_score(&fast_signals).max(self.config.base_risk);
        metadata.risk_score = aggregate_risk;

        let applicable = self.registry.applicable_rules(frame, metadata);
        let filtered = self.filter_by_risk_and_cost(applicable, aggregate_risk, metadata);
        let execution_order = self.order_for_execution(filtered);
        let estimated_cost = self.estimated_cost_ms(&execution_order);

        let early_termination_threshold = if aggregate_risk > self.config.elevated_risk_threshold
        {
            self.config.elevated_termination_threshold
        } else {
            self.config.standard_termination_threshold
        };

        debug!(
            risk = aggregate_risk,
            signals = fast_signals.len(),
            scheduled = execution_order.len(),
            estimated_cost_ms = estimated_cost,
            "created execution plan"
        );

        RuleExecutionPlan {
            rules_to_execute: execution_order.clone(),
            estimated_cost,
            risk_threshold: self.config.low_risk_threshold,
            early_termination_threshold,
            execution_order,
        }
    }

    /// Drop rules the current risk level does not justify: expensive rules
    /// on low-risk non-financial files, and any rule whose own risk
    /// threshold exceeds the aggregate risk.
    fn filter_by_risk_and_cost(
        &self,
        rules: Vec<String>,
        risk_score: f64,
        metadata: &FileMetadata,
    ) -> Vec<String> {
        rules
            .into_iter()
            .filter(|name| {
                let Some(rule) = self.registry.get(name) else {
                    return false;
                };

                if rule.cost == RuleCost::Expensive
                    && risk_score < self.config.low_risk_threshold
                    && metadata.file_type != Some(FileKind::Financial)
                {
                    debug!(rule = %name, risk = risk_score, "dropping expensive rule at low risk");
                    return false;
                }

                if risk_score < rule.risk_threshold {
                    debug!(rule = %name, risk = risk_score, "risk below rule threshold");
                    return false;
                }

                true
            })
            .collect()
    }

    /// Partition into cheap/medium/expensive tiers, each sorted by
    /// descending priority, and concatenate cheapest first.
    ///
    /// This explicit partition carries the ordering guarantee; it does not
    /// rely on any string comparison of tier labels.
    fn order_for_execution(&self, rules: Vec<String>) -> Vec<String> {
        let mut cheap = Vec::new();
        let mut medium = Vec::new();
        let mut expensive = Vec::new();

        for name in rules {
            let Some(rule) = self.registry.get(&name) else {
                continue;
            };
            match rule.cost {
                RuleCost::Cheap => cheap.push(name),
                RuleCost::Medium => medium.push(name),
                RuleCost::Expensive => expensive.push(name),
            }
        }

        let by_priority_desc = |group: &mut Vec<String>| {
            group.sort_by_key(|name| {
                std::cmp::Reverse(self.registry.get(name).map(|r| r.priority).unwrap_or(0))
            });
        };
        by_priority_desc(&mut cheap);
        by_priority_desc(&mut medium);
        by_priority_desc(&mut expensive);

        cheap.into_iter().chain(medium).chain(expensive).collect()
    }

    fn estimated_cost_ms(&self, rules: &[String]) -> f64 {
        rules
            .iter()
            .filter_map(|name| self.registry.get(name))
            .map(|rule| self.config.cost_ms(rule.cost))
            .sum()
    }

    /// Whether the executor should stop applying further rules.
    ///
    /// Pure predicate over the executor's running risk estimate; the router
    /// itself never loops over rules or updates risk during execution.
    pub fn should_terminate_early(&self, current_risk: f64, threshold: f64) -> bool {
        current_risk >= threshold
    }

    /// Diagnostic breakdown of a plan for operational exposure.
    pub fn plan_summary(&self, plan: &RuleExecutionPlan) -> PlanSummary {
        let mut rule_breakdown = IndexMap::new();
        for name in &plan.rules_to_execute {
            if let Some(rule) = self.registry.get(name) {
                rule_breakdown.insert(
                    name.clone(),
                    RuleBreakdown {
                        category: rule.category.to_string(),
                        cost: rule.cost.to_string(),
                        priority: rule.priority,
                        estimated_time_ms: self.config.cost_ms(rule.cost),
                    },
                );
            }
        }

        PlanSummary {
            total_rules: plan.rules_to_execute.len(),
            estimated_total_time_ms: plan.estimated_cost,
            rule_breakdown,
            early_termination_threshold: plan.early_termination_threshold,
        }
    }
}
