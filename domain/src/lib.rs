//! Domain layer for target-panel
//!
//! This crate contains the tool registry entities, the duplicate-merge and
//! backfill rules, and the parser invocation contract. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Registry
//!
//! - **ToolDefinition**: one security tool, keyed by `id`
//! - **Merge**: exactly one surviving definition per id, `types` unioned
//! - **Backfill**: restore `types` for ids known to lose them during repair
//!
//! ## Parser
//!
//! - **Capability**: a parsing routine addressed by qualified name
//! - **InvocationResult**: the envelope every invocation produces

pub mod parser;
pub mod registry;

// Re-export commonly used types
pub use parser::{
    CapabilityError, InvocationResult, InvocationStatus, ParseOptions, ParserCapability,
};
pub use registry::{
    BackfillPolicy, BackfillRule, MergeReport, MergedDuplicate, TargetTypes, ToolDefinition,
    merge_duplicates,
};
