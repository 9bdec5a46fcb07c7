//! Duplicate-id merging
//!
//! A registry must hold exactly one definition per id. When the same id
//! appears more than once, the first occurrence survives in place and later
//! occurrences only contribute their `types`:
//!
//! | Field of the duplicate | Effect on the survivor |
//! |------------------------|------------------------|
//! | `types`                | set-unioned in (created if absent) |
//! | anything else          | discarded (first-seen wins) |

use std::collections::HashMap;

use super::entities::ToolDefinition;

/// A duplicate that was folded into an earlier definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDuplicate {
    /// The shared id
    pub id: String,
    /// Position of the duplicate in the input sequence
    pub input_index: usize,
    /// Whether the duplicate contributed `types` to the survivor
    pub contributed_types: bool,
}

/// Result of merging a decoded registry
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Surviving definitions in first-seen order
    pub definitions: Vec<ToolDefinition>,
    /// Every duplicate that was folded away
    pub merged: Vec<MergedDuplicate>,
}

impl MergeReport {
    pub fn duplicates_merged(&self) -> usize {
        self.merged.len()
    }
}

/// Merge duplicate ids in a single pass.
///
/// The accumulator is local to the call; output order is the first-seen
/// order of ids.
pub fn merge_duplicates(tools: Vec<ToolDefinition>) -> MergeReport {
    let mut definitions: Vec<ToolDefinition> = Vec::with_capacity(tools.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged = Vec::new();

    for (input_index, tool) in tools.into_iter().enumerate() {
        match positions.get(&tool.id) {
            Some(&position) => {
                let survivor = &mut definitions[position];
                let contributed_types = match &tool.types {
                    Some(types) => {
                        survivor.absorb_types(types);
                        true
                    }
                    None => false,
                };
                merged.push(MergedDuplicate {
                    id: tool.id,
                    input_index,
                    contributed_types,
                });
            }
            None => {
                positions.insert(tool.id.clone(), definitions.len());
                definitions.push(tool);
            }
        }
    }

    MergeReport {
        definitions,
        merged,
    }
}
