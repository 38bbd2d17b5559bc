//! Upgrade group eligibility: named predicates over a character, a slot and the item in it,
//! combined per group into one verdict.

mod context;
mod engine;
mod predicate;

pub use context::UpgradeContext;
pub use engine::{group_eligible, group_verdict, is_upgrade_eligible, predicate_result};
pub use predicate::Predicate;
