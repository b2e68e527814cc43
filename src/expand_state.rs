use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Expanded/collapsed flag per node id.
///
/// Entries are independent of each other: collapsing a parent leaves the
/// flags of its descendants untouched, so re-expanding the parent restores
/// them as they were. A missing entry reads as collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandState {
    expanded: HashMap<String, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store where exactly the given ids start expanded
    pub fn with_expanded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: ids.into_iter().map(|id| (id.into(), true)).collect(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Flip the flag for `id` and return the new value
    pub fn toggle(&mut self, id: &str) -> bool {
        let entry = self.expanded.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
        log::debug!("🌲 ExpandState::toggle: {} -> {}", id, *entry);
        *entry
    }

    /// Ids currently marked expanded, sorted for stable output
    pub fn expanded_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .expanded
            .iter()
            .filter(|(_, expanded)| **expanded)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl From<HashMap<String, bool>> for ExpandState {
    fn from(expanded: HashMap<String, bool>) -> Self {
        Self { expanded }
    }
}
