//! Rule registry: the catalog of detection-rule descriptors.
//!
//! The registry does not hold rule *implementations* — executing a rule is
//! the external executor's job. It holds [`RuleMetadata`] descriptors (cost
//! tier, priority, applicability predicates, thresholds) and answers which
//! registered rules apply to a given dataset. Populate it once at startup
//! and treat it as read-only afterwards; all contained strategies are plain
//! data and function pointers, so a populated registry is `Send + Sync`.

mod builtin;
mod predicate;

pub use predicate::{PredicateKind, RulePredicate};

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::Frame;

use crate::canonicalize::FileMetadata;

// ── Categories and cost tiers ───────────────────────────────────────

/// Rule categories for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Financial,
    Temporal,
    Behavioral,
    Inventory,
    Network,
    MlAnomaly,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Financial => "financial",
            RuleCategory::Temporal => "temporal",
            RuleCategory::Behavioral => "behavioral",
            RuleCategory::Inventory => "inventory",
            RuleCategory::Network => "network",
            RuleCategory::MlAnomaly => "ml_anomaly",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule execution cost tier.
///
/// The derived ordering follows declaration order (cheap < medium <
/// expensive) and is what the router's partitioning relies on. The *label*
/// ordering used by [`RuleRegistry::applicable_rules`] is lexical and does
/// not match it — see the note there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCost {
    /// Simple calculations, well under 10ms.
    Cheap,
    /// Moderate processing, 10–100ms.
    Medium,
    /// ML models and complex analysis, beyond 100ms.
    Expensive,
}

impl RuleCost {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCost::Cheap => "cheap",
            RuleCost::Medium => "medium",
            RuleCost::Expensive => "expensive",
        }
    }
}

impl fmt::Display for RuleCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Rule metadata ───────────────────────────────────────────────────

/// Descriptor for one detection rule.
#[derive(Debug, Clone)]
pub struct RuleMetadata {
    /// Primary key, unique across the registry.
    pub name: String,
    pub category: RuleCategory,
    pub cost: RuleCost,
    /// Applicability gates; a rule applies only when every predicate holds.
    pub predicates: Vec<RulePredicate>,
    /// Free-form tags: file types, data requirements, etc.
    pub tags: Vec<String>,
    /// 1–10, higher = more important.
    pub priority: u8,
    pub description: String,
    pub confidence_threshold: f64,
    /// The rule is never selected while the aggregate risk is below this.
    pub risk_threshold: f64,
}

// ── Registry ────────────────────────────────────────────────────────

/// Catalog of rule descriptors keyed by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<String, RuleMetadata>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> RuleRegistry {
        RuleRegistry {
            rules: IndexMap::new(),
        }
    }

    /// Create a registry populated with the built-in rule set.
    pub fn with_builtin_rules() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        builtin::register_builtin_rules(&mut registry);
        registry
    }

    /// Register a rule, overwriting any existing entry with the same name.
    pub fn register(&mut self, rule: RuleMetadata) {
        self.rules.insert(rule.name.clone(), rule);
    }

    /// Get a rule descriptor by name.
    pub fn get(&self, name: &str) -> Option<&RuleMetadata> {
        self.rules.get(name)
    }

    /// Registered rule names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the rules whose every predicate holds for this dataset.
    ///
    /// Sorted by descending priority with the *cost label* as the secondary
    /// key, so "expensive" sorts before "medium". That label comparison
    /// does not match the cheap→medium→expensive tier order; it is kept as
    /// the registry's historical default ordering, and the router's
    /// explicit cost partition is the ordering execution actually follows.
    pub fn applicable_rules(&self, frame: &Frame, metadata: &FileMetadata) -> Vec<String> {
        let mut applicable: Vec<&RuleMetadata> = Vec::new();

        for rule in self.rules.values() {
            let failed = rule
                .predicates
                .iter()
                .find(|p| !p.evaluate(frame, metadata));
            match failed {
                Some(predicate) => {
                    debug!(
                        rule = %rule.name,
                        predicate = %predicate,
                        "rule not applicable"
                    );
                }
                None => applicable.push(rule),
            }
        }

        applicable.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.cost.as_str().cmp(b.cost.as_str()))
        });

        applicable.into_iter().map(|r| r.name.clone()).collect()
    }
}
