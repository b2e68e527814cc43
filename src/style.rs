use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::document::{IconKind, NodeType};

/// Presentation attributes selected by a node's type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleBundle {
    /// Fill behind the node's header; `None` leaves the terminal default
    pub background: Option<Color>,
    /// Colored bar drawn at the left edge of every row of the node
    pub border_accent: Option<Color>,
    pub text: Color,
    /// Fill behind the details and checklist blocks
    pub block_tint: Option<Color>,
    /// Color of the arrow and check markers
    pub marker: Color,
    pub emphasis: Modifier,
}

impl StyleBundle {
    pub fn header_style(&self) -> Style {
        let style = Style::default()
            .fg(self.text)
            .add_modifier(Modifier::BOLD | self.emphasis);
        match self.background {
            Some(bg) => style.bg(bg),
            None => style,
        }
    }

    pub fn body_style(&self) -> Style {
        let style = Style::default().fg(self.text);
        match self.background {
            Some(bg) => style.bg(bg),
            None => style,
        }
    }

    pub fn block_style(&self) -> Style {
        match self.block_tint {
            // Light tints need a dark foreground whatever the terminal default is
            Some(tint) if self.text == Color::Reset => Style::default().fg(Color::Black).bg(tint),
            Some(tint) => Style::default().fg(self.text).bg(tint),
            None => Style::default().fg(self.text),
        }
    }

    pub fn marker_style(&self) -> Style {
        self.block_style().fg(self.marker).add_modifier(Modifier::BOLD)
    }
}

/// Pale fills behind detail blocks of the unsaturated types
const BLOCK_GRAY: Color = Color::Rgb(243, 244, 246);
const BLOCK_BLUE: Color = Color::Rgb(219, 234, 254);

/// Neutral style used for `NodeType::Plain` and anything unrecognised
pub const DEFAULT_STYLE: StyleBundle = StyleBundle {
    background: None,
    border_accent: Some(Color::Gray),
    text: Color::Reset,
    block_tint: Some(BLOCK_GRAY),
    marker: Color::Green,
    emphasis: Modifier::empty(),
};

pub fn style_for(node_type: NodeType) -> StyleBundle {
    match node_type {
        NodeType::Phase => StyleBundle {
            background: Some(Color::Blue),
            border_accent: None,
            text: Color::White,
            block_tint: Some(Color::LightBlue),
            marker: Color::White,
            emphasis: Modifier::empty(),
        },
        NodeType::Step => StyleBundle {
            background: None,
            border_accent: Some(Color::Green),
            text: Color::Reset,
            block_tint: Some(BLOCK_GRAY),
            marker: Color::Green,
            emphasis: Modifier::empty(),
        },
        NodeType::Substep => StyleBundle {
            background: None,
            border_accent: Some(Color::DarkGray),
            text: Color::Reset,
            block_tint: Some(BLOCK_GRAY),
            marker: Color::Green,
            emphasis: Modifier::empty(),
        },
        NodeType::Decision => StyleBundle {
            background: Some(Color::Yellow),
            border_accent: None,
            text: Color::Black,
            block_tint: Some(Color::LightYellow),
            marker: Color::Black,
            emphasis: Modifier::empty(),
        },
        NodeType::Critical => StyleBundle {
            background: Some(Color::Red),
            border_accent: None,
            text: Color::White,
            block_tint: Some(Color::LightRed),
            marker: Color::White,
            emphasis: Modifier::empty(),
        },
        NodeType::Info => StyleBundle {
            background: None,
            border_accent: Some(Color::Cyan),
            text: Color::Reset,
            block_tint: Some(BLOCK_BLUE),
            marker: Color::Blue,
            emphasis: Modifier::empty(),
        },
        NodeType::Plain => DEFAULT_STYLE,
    }
}

/// Metadata tag kinds rendered after the title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Owner,
    Timeline,
}

pub fn tag_style(node_type: NodeType, kind: TagKind) -> Style {
    // Saturated panels keep their own colors for tags
    match node_type {
        NodeType::Phase | NodeType::Decision | NodeType::Critical => {
            style_for(node_type).body_style().add_modifier(Modifier::ITALIC)
        }
        _ => match kind {
            TagKind::Owner => Style::default().fg(Color::Blue),
            TagKind::Timeline => Style::default().fg(Color::Green),
        },
    }
}

/// Maps a glyph key to something drawable
pub trait IconProvider {
    /// `None` means no icon is drawn
    fn glyph(&self, icon: IconKind) -> Option<&'static str>;
}

/// Unicode symbols, the default
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeIcons;

impl IconProvider for UnicodeIcons {
    fn glyph(&self, icon: IconKind) -> Option<&'static str> {
        match icon {
            IconKind::Clock => Some("◷"),
            IconKind::User => Some("☺"),
            IconKind::Alert => Some("⚠"),
            IconKind::Check => Some("✔"),
            IconKind::File => Some("▤"),
            IconKind::Mail => Some("✉"),
            IconKind::Upload => Some("⇧"),
            IconKind::Bell => Some("♪"),
            IconKind::Unknown => None,
        }
    }
}

/// Plain ASCII tags for terminals without the symbol glyphs
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiIcons;

impl IconProvider for AsciiIcons {
    fn glyph(&self, icon: IconKind) -> Option<&'static str> {
        match icon {
            IconKind::Clock => Some("[clock]"),
            IconKind::User => Some("[user]"),
            IconKind::Alert => Some("[!]"),
            IconKind::Check => Some("[ok]"),
            IconKind::File => Some("[file]"),
            IconKind::Mail => Some("[mail]"),
            IconKind::Upload => Some("[upload]"),
            IconKind::Bell => Some("[bell]"),
            IconKind::Unknown => None,
        }
    }
}

/// Selectable icon provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconSet {
    #[default]
    Unicode,
    Ascii,
}

impl IconSet {
    pub fn provider(self) -> &'static dyn IconProvider {
        match self {
            IconSet::Unicode => &UnicodeIcons,
            IconSet::Ascii => &AsciiIcons,
        }
    }
}

/// Look up an optional icon; absence renders nothing
pub fn glyph_for(icons: &dyn IconProvider, icon: Option<IconKind>) -> Option<&'static str> {
    icon.and_then(|icon| icons.glyph(icon))
}
