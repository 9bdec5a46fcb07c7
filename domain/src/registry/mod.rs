//! Registry domain module
//!
//! The registry is a JSON array of [`ToolDefinition`]s that the scanning
//! orchestrator reads to decide how to run and parse each security tool.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ decoded defs │───▶│ merge        │───▶│ backfill     │───▶ canonical registry
//! │ (with dups)  │    │ (one per id) │    │ (known ids)  │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Text-level repair of a malformed document happens before decoding and
//! lives in the infrastructure layer; this module only sees decoded data.

pub mod backfill;
pub mod entities;
pub mod merge;

pub use backfill::{BackfillPolicy, BackfillRule};
pub use entities::{TargetTypes, ToolDefinition};
pub use merge::{MergeReport, MergedDuplicate, merge_duplicates};
