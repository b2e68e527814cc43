//! Recursive rendering of the outline into a presentation tree.
//!
//! The output is a pure function of the model, the expand state and the
//! icon provider: nothing is cached between calls, and collapsed subtrees
//! are simply absent from the result.

use crate::document::{NodeType, TreeNode};
use crate::expand_state::ExpandState;
use crate::style::{glyph_for, style_for, IconProvider, StyleBundle, TagKind};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns of indentation added per nesting level
pub const INDENT_WIDTH: usize = 4;
/// Extra padding of the body rows under a header
pub const BODY_PAD: &str = "  ";
pub const ARROW_MARKER: &str = "→";
pub const CHECK_MARKER: &str = "✓";
/// Narrowest text column worth wrapping into
const MIN_WRAP_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Collapsed,
    Expanded,
}

impl Indicator {
    pub fn glyph(self) -> &'static str {
        match self {
            Indicator::Collapsed => "▶",
            Indicator::Expanded => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    pub value: &'a str,
}

impl Tag<'_> {
    pub fn label(&self) -> String {
        match self.kind {
            TagKind::Owner => format!("[owner: {}]", self.value),
            TagKind::Timeline => format!("[timeline: {}]", self.value),
        }
    }
}

/// Presentation of one node, borrowing its content from the model
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode<'a> {
    pub id: &'a str,
    pub depth: usize,
    pub indent: usize,
    pub node_type: NodeType,
    pub style: StyleBundle,
    pub indicator: Option<Indicator>,
    pub icon: Option<&'static str>,
    pub title: &'a str,
    pub tags: Vec<Tag<'a>>,
    pub description: Option<&'a str>,
    pub details: &'a [String],
    pub checklist: &'a [String],
    pub children: Vec<RenderedNode<'a>>,
}

impl<'a> RenderedNode<'a> {
    /// Only expandable nodes react to activation
    pub fn is_activatable(&self) -> bool {
        self.indicator.is_some()
    }

    pub fn is_expanded(&self) -> bool {
        self.indicator == Some(Indicator::Expanded)
    }

    /// Ids of this node and every rendered descendant, pre-order
    pub fn visible_ids(&self, out: &mut Vec<&'a str>) {
        out.push(self.id);
        for child in &self.children {
            child.visible_ids(out);
        }
    }

    /// Flatten into display rows, pre-order
    pub fn lines(&self, out: &mut Vec<OutlineLine<'a>>) {
        let line = |kind| OutlineLine {
            node_id: self.id,
            indent: self.indent,
            node_type: self.node_type,
            style: self.style,
            kind,
        };

        out.push(line(LineKind::Header {
            indicator: self.indicator,
            icon: self.icon,
            title: self.title,
        }));
        if !self.tags.is_empty() {
            out.push(line(LineKind::Tags(self.tags.clone())));
        }
        if let Some(description) = self.description {
            out.push(line(LineKind::Description(description)));
        }
        for detail in self.details {
            out.push(line(LineKind::Detail(detail)));
        }
        for item in self.checklist {
            out.push(line(LineKind::Checklist(item)));
        }
        for child in &self.children {
            child.lines(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Header {
        indicator: Option<Indicator>,
        icon: Option<&'static str>,
        title: &'a str,
    },
    Tags(Vec<Tag<'a>>),
    Description(&'a str),
    Detail(&'a str),
    Checklist(&'a str),
    /// Overflow of a wrapped row, hung under the text it continues
    Continuation {
        text: &'a str,
        hang: usize,
        of: Wrapped,
    },
}

/// Which kind of row a continuation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapped {
    Title,
    Description,
    Block,
}

/// One display row, tagged with the node that owns it
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineLine<'a> {
    pub node_id: &'a str,
    pub indent: usize,
    pub node_type: NodeType,
    pub style: StyleBundle,
    pub kind: LineKind<'a>,
}

impl<'a> OutlineLine<'a> {
    pub fn is_header(&self) -> bool {
        matches!(self.kind, LineKind::Header { .. })
    }

    /// Header rows and the continuations of their titles
    pub fn is_title(&self) -> bool {
        matches!(
            self.kind,
            LineKind::Header { .. }
                | LineKind::Continuation {
                    of: Wrapped::Title,
                    ..
                }
        )
    }

    /// The text that may wrap, with the columns drawn in front of it
    fn wrappable(&self) -> Option<(&'a str, usize, Wrapped)> {
        let marked = |marker: &str| BODY_PAD.width() + marker.width() + 1;
        match &self.kind {
            LineKind::Header {
                indicator,
                icon,
                title,
            } => {
                let indicator = indicator.map_or(0, |indicator| indicator.glyph().width() + 1);
                let icon = icon.map_or(0, |icon| icon.width() + 1);
                Some((*title, indicator + icon, Wrapped::Title))
            }
            LineKind::Description(text) => Some((*text, BODY_PAD.width(), Wrapped::Description)),
            LineKind::Detail(text) => Some((*text, marked(ARROW_MARKER), Wrapped::Block)),
            LineKind::Checklist(text) => Some((*text, marked(CHECK_MARKER), Wrapped::Block)),
            LineKind::Tags(_) | LineKind::Continuation { .. } => None,
        }
    }

    /// Same row with its text replaced
    fn with_text(&self, text: &'a str) -> Self {
        let kind = match &self.kind {
            LineKind::Header {
                indicator, icon, ..
            } => LineKind::Header {
                indicator: *indicator,
                icon: *icon,
                title: text,
            },
            LineKind::Description(_) => LineKind::Description(text),
            LineKind::Detail(_) => LineKind::Detail(text),
            LineKind::Checklist(_) => LineKind::Checklist(text),
            other => other.clone(),
        };
        OutlineLine {
            kind,
            ..self.clone()
        }
    }

    /// Row text without indentation
    pub fn content(&self) -> String {
        match &self.kind {
            LineKind::Header {
                indicator,
                icon,
                title,
            } => {
                let mut text = String::new();
                if let Some(indicator) = indicator {
                    text.push_str(indicator.glyph());
                    text.push(' ');
                }
                if let Some(icon) = icon {
                    text.push_str(icon);
                    text.push(' ');
                }
                text.push_str(title);
                text
            }
            LineKind::Tags(tags) => format!(
                "{}{}",
                BODY_PAD,
                tags.iter().map(Tag::label).collect::<Vec<_>>().join(" ")
            ),
            LineKind::Description(text) => format!("{}{}", BODY_PAD, text),
            LineKind::Detail(text) => format!("{}{} {}", BODY_PAD, ARROW_MARKER, text),
            LineKind::Checklist(text) => format!("{}{} {}", BODY_PAD, CHECK_MARKER, text),
            LineKind::Continuation { text, hang, .. } => format!("{}{}", " ".repeat(*hang), text),
        }
    }

    pub fn to_plain(&self) -> String {
        format!("{}{}", " ".repeat(self.indent), self.content())
    }
}

/// Walks the model and produces [`RenderedNode`]s
pub struct Renderer<'i> {
    icons: &'i dyn IconProvider,
    indent_width: usize,
}

impl<'i> Renderer<'i> {
    pub fn new(icons: &'i dyn IconProvider) -> Self {
        Self {
            icons,
            indent_width: INDENT_WIDTH,
        }
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        // Zero would flatten the hierarchy
        self.indent_width = indent_width.max(1);
        self
    }

    pub fn render<'a>(&self, roots: &'a [TreeNode], state: &ExpandState) -> Vec<RenderedNode<'a>> {
        roots
            .iter()
            .map(|root| self.render_node(root, 0, state))
            .collect()
    }

    pub fn render_node<'a>(
        &self,
        node: &'a TreeNode,
        depth: usize,
        state: &ExpandState,
    ) -> RenderedNode<'a> {
        let has_children = node.has_children();
        let expanded = has_children && state.is_expanded(&node.id);

        let indicator = if !has_children {
            None
        } else if expanded {
            Some(Indicator::Expanded)
        } else {
            Some(Indicator::Collapsed)
        };

        let mut tags = Vec::new();
        if let Some(owner) = node.owner.as_deref() {
            tags.push(Tag {
                kind: TagKind::Owner,
                value: owner,
            });
        }
        if let Some(timeline) = node.timeline.as_deref() {
            tags.push(Tag {
                kind: TagKind::Timeline,
                value: timeline,
            });
        }

        let children = if expanded {
            node.children()
                .iter()
                .map(|child| self.render_node(child, depth + 1, state))
                .collect()
        } else {
            Vec::new()
        };

        RenderedNode {
            id: &node.id,
            depth,
            indent: depth * self.indent_width,
            node_type: node.node_type,
            style: style_for(node.node_type),
            indicator,
            icon: glyph_for(self.icons, node.icon),
            title: &node.title,
            tags,
            description: node.description.as_deref(),
            details: node.details.as_deref().unwrap_or(&[]),
            checklist: node.checklist.as_deref().unwrap_or(&[]),
            children,
        }
    }
}

/// Render a forest with the default indentation
pub fn render<'a>(
    roots: &'a [TreeNode],
    state: &ExpandState,
    icons: &dyn IconProvider,
) -> Vec<RenderedNode<'a>> {
    Renderer::new(icons).render(roots, state)
}

/// All display rows of a rendered forest
pub fn outline_lines<'a>(nodes: &[RenderedNode<'a>]) -> Vec<OutlineLine<'a>> {
    let mut lines = Vec::new();
    for node in nodes {
        node.lines(&mut lines);
    }
    lines
}

/// Word-wrap `text` into rows of at most `width` columns.
///
/// Rows break at the last space that fits; a word wider than the row is
/// broken inside. The rows borrow from `text`.
pub fn wrap_text(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut rest = text;
    while rest.width() > width {
        let mut used = 0;
        let mut split = rest.len();
        let mut last_space = None;
        for (i, ch) in rest.char_indices() {
            if ch == ' ' {
                last_space = Some(i);
            }
            let ch_width = ch.width().unwrap_or(0);
            if used + ch_width > width {
                split = i;
                break;
            }
            used += ch_width;
        }
        let end = match last_space {
            Some(space) if space > 0 => space,
            // A lone character wider than the row still takes a row
            _ if split == 0 => rest.chars().next().map_or(rest.len(), char::len_utf8),
            _ => split,
        };
        rows.push(rest[..end].trim_end());
        rest = rest[end..].trim_start();
    }
    if !rest.is_empty() || rows.is_empty() {
        rows.push(rest);
    }
    rows
}

/// Split rows wider than `width` columns into continuation rows owned by the same node.
///
/// Tag rows are left alone, as are rows whose text column would be too narrow to read.
pub fn wrap_lines<'a>(lines: Vec<OutlineLine<'a>>, width: usize) -> Vec<OutlineLine<'a>> {
    let mut wrapped = Vec::with_capacity(lines.len());
    for line in lines {
        let Some((text, hang, of)) = line.wrappable() else {
            wrapped.push(line);
            continue;
        };
        let available = width.saturating_sub(line.indent + hang);
        if available < MIN_WRAP_WIDTH || text.width() <= available {
            wrapped.push(line);
            continue;
        }

        let mut rows = wrap_text(text, available).into_iter();
        let first = rows.next().unwrap_or(text);
        wrapped.push(line.with_text(first));
        for row in rows {
            wrapped.push(OutlineLine {
                kind: LineKind::Continuation {
                    text: row,
                    hang,
                    of,
                },
                ..line.clone()
            });
        }
    }
    wrapped
}

/// Deterministic plain-text form of a rendered forest
pub fn to_text(nodes: &[RenderedNode<'_>]) -> String {
    let mut text = String::new();
    for line in outline_lines(nodes) {
        text.push_str(&line.to_plain());
        text.push('\n');
    }
    text
}
