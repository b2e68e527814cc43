use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SopTreeError};

const BUILTIN_DOCUMENT: &str = include_str!("../assets/sop.json");

/// Visual category of a node. Anything unrecognised falls back to `Plain`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Phase,
    Step,
    Substep,
    Decision,
    Critical,
    Info,
    #[default]
    #[serde(other)]
    Plain,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Phase,
        NodeType::Step,
        NodeType::Substep,
        NodeType::Decision,
        NodeType::Critical,
        NodeType::Info,
        NodeType::Plain,
    ];
}

/// Glyph key attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Clock,
    User,
    Alert,
    Check,
    File,
    Mail,
    Upload,
    Bell,
    #[serde(other)]
    Unknown,
}

impl IconKind {
    pub const ALL: [IconKind; 9] = [
        IconKind::Clock,
        IconKind::User,
        IconKind::Alert,
        IconKind::Check,
        IconKind::File,
        IconKind::Mail,
        IconKind::Upload,
        IconKind::Bell,
        IconKind::Unknown,
    ];
}

/// Represents a single entry of the procedure outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Create a node with only the required fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            node_type,
            icon: None,
            timeline: None,
            owner: None,
            description: None,
            details: None,
            checklist: None,
            children: None,
        }
    }

    pub fn with_icon(mut self, icon: IconKind) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = Some(timeline.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = Some(details.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_checklist<I, S>(mut self, checklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checklist = Some(checklist.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Children in display order; empty when the key is absent
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// A node is expandable iff it has at least one child
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

/// One card of the summary strip shown above the outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconKind>,
}

/// The outline together with its static page chrome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default)]
    pub summary: Vec<SummaryCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(default)]
    pub principles: Vec<String>,
    /// Node ids that start expanded when a view is created
    #[serde(default)]
    pub expanded: Vec<String>,
    pub roots: Vec<TreeNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    Full(Document),
    Root(TreeNode),
    Forest(Vec<TreeNode>),
}

impl Document {
    /// Wrap a bare forest with empty chrome
    pub fn from_roots(roots: Vec<TreeNode>) -> Self {
        let title = roots
            .first()
            .map(|root| root.title.clone())
            .unwrap_or_default();
        Self {
            title,
            subtitle: None,
            purpose: None,
            summary: Vec::new(),
            notice: None,
            principles: Vec::new(),
            expanded: Vec::new(),
            roots,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: DocumentFile = serde_json::from_str(content).map_err(|e| {
            SopTreeError::Document(format!(
                "expected a document, a node or a list of nodes: {}",
                e
            ))
        })?;
        Ok(match file {
            DocumentFile::Full(document) => document,
            DocumentFile::Root(root) => Self::from_roots(vec![root]),
            DocumentFile::Forest(roots) => Self::from_roots(roots),
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("📄 Document::load_from_file: loading {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        log::debug!(
            "📄 Document::load_from_file: {} root nodes, {} initially expanded",
            document.roots.len(),
            document.expanded.len()
        );
        Ok(document)
    }

    /// The procedure bundled with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_DOCUMENT)
    }

    /// Load from `path` if given, otherwise fall back to the bundled document
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::builtin(),
        }
    }

    /// Find a node anywhere in the forest
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.path_to(id).and_then(|path| path.last().copied())
    }

    /// Chain of nodes from a root down to the node with `id`, inclusive
    pub fn path_to(&self, id: &str) -> Option<Vec<&TreeNode>> {
        let mut path = Vec::new();
        for root in &self.roots {
            if Self::path_to_recursive(root, id, &mut path) {
                return Some(path);
            }
        }
        None
    }

    fn path_to_recursive<'a>(node: &'a TreeNode, id: &str, path: &mut Vec<&'a TreeNode>) -> bool {
        path.push(node);
        if node.id == id {
            return true;
        }
        for child in node.children() {
            if Self::path_to_recursive(child, id, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    pub fn parent_of(&self, id: &str) -> Option<&TreeNode> {
        let path = self.path_to(id)?;
        if path.len() < 2 {
            return None;
        }
        path.get(path.len() - 2).copied()
    }
}
