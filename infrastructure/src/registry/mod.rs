//! Tool registry adapters
//!
//! - [`FileRegistryStore`]: the JSON file on disk
//! - [`StructuralRepairer`]: regex rules for known malformations

mod repair;
mod store;

pub use repair::{RegexRepairRule, RuleOutcome, StructuralRepairer};
pub use store::FileRegistryStore;
