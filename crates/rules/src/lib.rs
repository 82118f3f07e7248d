//! Adaptive rule selection and scheduling for tabular anomaly analysis.
//!
//! This crate decides *which* detection rules are worth running against an
//! unlabeled dataset, *in what order*, and *when an executor may stop early*
//! — before any expensive rule executes:
//! - Schema canonicalization: file-type inference and column remapping onto
//!   a canonical field vocabulary
//! - Fast signals: a fixed battery of cheap statistical checks fused into an
//!   aggregate risk estimate
//! - Rule registry: rule descriptors with predicates, cost tiers, and
//!   priorities
//! - Rule router: risk/cost filtering, cost-partitioned ordering, and the
//!   advisory early-termination contract
//!
//! Rule *execution* and alert persistence belong to an external executor;
//! this crate only produces the plan.

pub mod canonicalize;
pub mod registry;
pub mod router;
pub mod signals;
