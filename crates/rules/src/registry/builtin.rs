//! The built-in rule catalog.
//!
//! Descriptors only: each entry names a detection strategy the external
//! executor knows how to run, together with its applicability gates, cost
//! tier, and priority.

use crate::canonicalize::FileKind;

use super::predicate::{PredicateKind, RulePredicate};
use super::{RuleCategory, RuleCost, RuleMetadata, RuleRegistry};

pub(super) fn register_builtin_rules(registry: &mut RuleRegistry) {
    registry.register(RuleMetadata {
        name: "high_value_transactions".to_string(),
        category: RuleCategory::Financial,
        cost: RuleCost::Cheap,
        predicates: vec![
            RulePredicate::new(
                "has_amount_field",
                PredicateKind::HasColumnWithValues("amount"),
                "Data must have amount field with values",
            ),
            RulePredicate::new(
                "sufficient_data",
                PredicateKind::MinRows(10),
                "Need at least 10 transactions for statistical analysis",
            ),
        ],
        tags: tags(&["financial", "amount", "statistical"]),
        priority: 8,
        description: "Detect unusually high-value transactions using 95th percentile".to_string(),
        confidence_threshold: 0.5,
        risk_threshold: 0.0,
    });

    registry.register(RuleMetadata {
        name: "duplicate_transactions".to_string(),
        category: RuleCategory::Financial,
        cost: RuleCost::Cheap,
        predicates: vec![
            RulePredicate::new(
                "has_amount_merchant",
                PredicateKind::HasColumns(&["amount", "merchant"]),
                "Need amount and merchant fields",
            ),
            RulePredicate::new(
                "has_timestamp",
                PredicateKind::HasColumns(&["timestamp"]),
                "Need timestamp for time-based grouping",
            ),
        ],
        tags: tags(&["financial", "duplicate", "merchant"]),
        priority: 7,
        description: "Detect duplicate transactions by amount, merchant, and time".to_string(),
        confidence_threshold: 0.5,
        risk_threshold: 0.0,
    });

    registry.register(RuleMetadata {
        name: "off_hours_transactions".to_string(),
        category: RuleCategory::Temporal,
        cost: RuleCost::Cheap,
        predicates: vec![
            RulePredicate::new(
                "has_timestamp",
                PredicateKind::HasColumns(&["timestamp"]),
                "Need timestamp for hour analysis",
            ),
            RulePredicate::new(
                "not_inventory_only",
                PredicateKind::FileTypeIsNot(FileKind::Inventory),
                "Skip for inventory files (24/7 operations)",
            ),
        ],
        tags: tags(&["temporal", "hours", "business"]),
        priority: 6,
        description: "Detect transactions outside normal business hours".to_string(),
        confidence_threshold: 0.5,
        risk_threshold: 0.0,
    });

    registry.register(RuleMetadata {
        name: "rapid_successive_transactions".to_string(),
        category: RuleCategory::Behavioral,
        cost: RuleCost::Medium,
        predicates: vec![
            RulePredicate::new(
                "has_user_timestamp",
                PredicateKind::HasColumns(&["user_id", "timestamp"]),
                "Need user_id and timestamp for user behavior analysis",
            ),
            RulePredicate::new(
                "multiple_users",
                PredicateKind::MultipleUsers("user_id"),
                "Need multiple users for pattern detection",
            ),
        ],
        tags: tags(&["behavioral", "user", "velocity"]),
        priority: 7,
        description: "Detect rapid successive transactions from same user".to_string(),
        confidence_threshold: 0.5,
        risk_threshold: 0.0,
    });

    registry.register(RuleMetadata {
        name: "anomaly_detection".to_string(),
        category: RuleCategory::MlAnomaly,
        cost: RuleCost::Expensive,
        predicates: vec![
            RulePredicate::new(
                "sufficient_data_for_ml",
                PredicateKind::MinRows(50),
                "Need at least 50 transactions for ML analysis",
            ),
            RulePredicate::new(
                "has_numeric_features",
                PredicateKind::MinNumericColumns(2),
                "Need at least 2 numeric features for ML",
            ),
            RulePredicate::new(
                "not_high_risk_already",
                PredicateKind::RiskBelow(0.8),
                "Skip if already high risk (early termination)",
            ),
        ],
        tags: tags(&["ml", "anomaly", "expensive"]),
        priority: 5,
        description: "Machine learning anomaly detection over numeric features".to_string(),
        confidence_threshold: 0.5,
        risk_threshold: 0.0,
    });

    registry.register(RuleMetadata {
        name: "inventory_movement_anomalies".to_string(),
        category: RuleCategory::Inventory,
        cost: RuleCost::Medium,
        predicates: vec![
            RulePredicate::new(
                "is_inventory_file",
                PredicateKind::FileTypeIs(FileKind::Inventory),
                "Only for inventory files",
            ),
            RulePredicate::new(
                "has_quantity_field",
                PredicateKind::HasColumns(&["quantity"]),
                "Need quantity field for inventory analysis",
            ),
        ],
        tags: tags(&["inventory", "movement", "quantity"]),
        priority: 6,
        description: "Detect unusual inventory movement patterns".to_string(),
        confidence_threshold: 0.5,
        risk_threshold: 0.0,
    });
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}
