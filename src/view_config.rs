use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::Result;
use crate::expand_state::ExpandState;
use crate::style::IconSet;

/// Serializable snapshot of a view, used by `screenshot`, `execute` and `save-state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Document to show; the bundled procedure when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<PathBuf>,
    #[serde(default)]
    pub expanded: ExpandState,
    #[serde(default)]
    pub selected: Option<String>,
    #[serde(default)]
    pub scroll_offset: usize,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub icons: IconSet,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            document: None,
            expanded: ExpandState::with_expanded(["root", "phase1"]),
            selected: Some("root".to_string()),
            scroll_offset: 0,
            status_message: "Ready".to_string(),
            icons: IconSet::Unicode,
        }
    }
}

impl ViewConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ViewConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_document(&self) -> Result<Document> {
        Document::load(self.document.as_deref())
    }

    pub fn from_app(app: &crate::app::App) -> Self {
        ViewConfig {
            document: app.document_path.clone(),
            expanded: app.expand_state.clone(),
            selected: app.selected.clone(),
            scroll_offset: app.scroll_offset,
            status_message: app.status_message.clone(),
            icons: app.config.icons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_matches_builtin_document() {
        let view = ViewConfig::default();
        let document = view.load_document().unwrap();
        assert_eq!(view.expanded, ExpandState::with_expanded(document.expanded.clone()));
        assert_eq!(view.selected.as_deref(), Some(document.roots[0].id.as_str()));
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let view: ViewConfig = serde_json::from_str("{}").unwrap();
        assert!(view.document.is_none());
        assert!(!view.expanded.is_expanded("root"));
        assert_eq!(view.selected, None);
        assert_eq!(view.icons, IconSet::Unicode);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("view.json");
        let mut view = ViewConfig::default();
        view.selected = Some("phase2".to_string());
        view.icons = IconSet::Ascii;
        view.save_to_file(&path).unwrap();

        assert_eq!(ViewConfig::load_from_file(&path).unwrap(), view);
    }
}
