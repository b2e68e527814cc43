use ratatui::layout::Rect;
use std::path::PathBuf;

use crate::command::Command;
use crate::config::Config;
use crate::document::Document;
use crate::expand_state::ExpandState;
use crate::render::{outline_lines, wrap_lines, OutlineLine, RenderedNode, Renderer};
use crate::view_config::ViewConfig;

pub struct App {
    pub document: Document,
    pub document_path: Option<PathBuf>,
    pub expand_state: ExpandState,
    pub config: Config,

    // Tree panel state
    pub selected: Option<String>,
    pub scroll_offset: usize,
    pub viewport_height: usize,
    /// Inner area of the tree panel from the last draw, for mouse hit testing
    pub tree_area: Rect,

    // UI state
    pub status_message: String,
    pub should_quit: bool,
    pub needs_redraw: bool,
    pub force_redraw: bool,
}

impl App {
    pub fn new(document: Document, config: Config) -> Self {
        let expand_state = ExpandState::with_expanded(document.expanded.iter().cloned());
        let selected = document.roots.first().map(|root| root.id.clone());
        Self {
            document,
            document_path: None,
            expand_state,
            config,
            selected,
            scroll_offset: 0,
            viewport_height: 20, // Default reasonable value
            tree_area: Rect::default(),
            status_message: "Ready".to_string(),
            should_quit: false,
            needs_redraw: true,
            force_redraw: false,
        }
    }

    pub fn with_document_path(mut self, path: Option<PathBuf>) -> Self {
        self.document_path = path;
        self
    }

    pub fn from_view_config(view: &ViewConfig, document: Document, mut config: Config) -> Self {
        config.icons = view.icons;
        let mut app = Self::new(document, config);
        app.document_path = view.document.clone();
        app.expand_state = view.expanded.clone();
        app.selected = view.selected.clone();
        app.scroll_offset = view.scroll_offset;
        app.status_message = view.status_message.clone();
        app
    }

    pub fn renderer(&self) -> Renderer<'static> {
        Renderer::new(self.config.icons.provider())
            .with_indent_width(self.config.layout.indent_width)
    }

    pub fn rendered(&self) -> Vec<RenderedNode<'_>> {
        self.renderer()
            .render(&self.document.roots, &self.expand_state)
    }

    /// Display rows of the tree panel, wrapped to its width once it has been laid out
    pub fn outline(&self) -> Vec<OutlineLine<'_>> {
        let lines = outline_lines(&self.rendered());
        // One column goes to the accent bar
        match self.tree_area.width {
            0 | 1 => lines,
            width => wrap_lines(lines, width as usize - 1),
        }
    }

    /// Ids of the node headers currently on screen, top to bottom
    pub fn visible_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for node in self.rendered() {
            node.visible_ids(&mut ids);
        }
        ids
    }

    fn selected_index(&self, visible: &[&str]) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        visible.iter().position(|id| *id == selected)
    }

    /// Row of the selected node's header within the outline
    pub fn selected_row(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.outline()
            .iter()
            .position(|line| line.is_header() && line.node_id == selected)
    }

    /// Flip the expand state of `id`. Nodes without children are left alone.
    pub fn activate(&mut self, id: &str) -> bool {
        let Some(node) = self.document.find(id) else {
            log::warn!("🌲 App::activate: no node with id {}", id);
            return false;
        };
        if !node.has_children() {
            log::debug!("🌲 App::activate: {} has no children, ignoring", id);
            return false;
        }
        let title = node.title.clone();

        let expanded = self.expand_state.toggle(id);
        self.needs_redraw = true;
        self.status_message = format!(
            "{} {}",
            if expanded { "Expanded" } else { "Collapsed" },
            title
        );
        log::info!("🌲 App::activate: {} expanded={}", id, expanded);

        self.ensure_selection_visible();
        true
    }

    pub fn toggle_selected(&mut self) -> bool {
        match self.selected.clone() {
            Some(id) => self.activate(&id),
            None => false,
        }
    }

    pub fn expand_selected(&mut self) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        let expandable = self.document.find(&id).is_some_and(|n| n.has_children());
        if expandable && !self.expand_state.is_expanded(&id) {
            self.activate(&id)
        } else {
            false
        }
    }

    /// Collapse the selected node, or step out to its parent when already collapsed
    pub fn collapse_selected(&mut self) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        let expandable = self.document.find(&id).is_some_and(|n| n.has_children());
        if expandable && self.expand_state.is_expanded(&id) {
            return self.activate(&id);
        }
        let parent = self.document.parent_of(&id).map(|p| p.id.clone());
        match parent {
            Some(parent) => self.select(&parent),
            None => false,
        }
    }

    /// Select a visible node by id
    pub fn select(&mut self, id: &str) -> bool {
        if !self.visible_ids().contains(&id) {
            return false;
        }
        if self.selected.as_deref() == Some(id) {
            return false;
        }
        self.selected = Some(id.to_string());
        self.needs_redraw = true;
        true
    }

    fn select_at(&mut self, index: usize) -> bool {
        let id = self.visible_ids().get(index).map(|id| id.to_string());
        match id {
            Some(id) => self.select(&id),
            None => false,
        }
    }

    pub fn select_next(&mut self) -> bool {
        self.move_selection(1)
    }

    pub fn select_previous(&mut self) -> bool {
        self.move_selection(-1)
    }

    fn move_selection(&mut self, delta: isize) -> bool {
        let (current, count) = {
            let visible = self.visible_ids();
            (self.selected_index(&visible), visible.len())
        };
        if count == 0 {
            return false;
        }
        let target = match current {
            Some(current) => {
                let target = current as isize + delta;
                target.clamp(0, count as isize - 1) as usize
            }
            None => 0,
        };
        self.select_at(target)
    }

    pub fn select_first(&mut self) -> bool {
        self.select_at(0)
    }

    pub fn select_last(&mut self) -> bool {
        let count = self.visible_ids().len();
        match count {
            0 => false,
            count => self.select_at(count - 1),
        }
    }

    /// Move about one screen of outline rows, landing on a node header
    fn page(&mut self, forward: bool) -> bool {
        let page = self.viewport_height.saturating_sub(1).max(1);
        let headers: Vec<(usize, String)> = self
            .outline()
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_header())
            .map(|(row, line)| (row, line.node_id.to_string()))
            .collect();
        let current = self
            .selected
            .as_deref()
            .and_then(|selected| headers.iter().find(|(_, id)| id == selected))
            .map(|(row, _)| *row);
        let Some(current) = current else {
            return self.select_first();
        };

        // Furthest header within a page, or the next one when a single node is taller
        let target = if forward {
            let ahead = headers.iter().filter(|(row, _)| *row > current);
            ahead
                .clone()
                .take_while(|(row, _)| *row - current <= page)
                .last()
                .or_else(|| ahead.clone().next())
        } else {
            let behind = headers.iter().rev().filter(|(row, _)| *row < current);
            behind
                .clone()
                .take_while(|(row, _)| current - *row <= page)
                .last()
                .or_else(|| behind.clone().next())
        };
        match target.map(|(_, id)| id.clone()) {
            Some(id) => self.select(&id),
            None => false,
        }
    }

    /// Move the selection to the nearest visible ancestor if it got hidden
    pub fn ensure_selection_visible(&mut self) {
        let replacement = {
            let visible = self.visible_ids();
            match self.selected.as_deref() {
                Some(selected) if visible.contains(&selected) => return,
                Some(selected) => self
                    .document
                    .path_to(selected)
                    .and_then(|path| {
                        path.iter()
                            .rev()
                            .find(|node| visible.contains(&node.id.as_str()))
                            .map(|node| node.id.clone())
                    })
                    .or_else(|| visible.first().map(|id| id.to_string())),
                None => visible.first().map(|id| id.to_string()),
            }
        };
        log::debug!("🌲 App::ensure_selection_visible: now {:?}", replacement);
        self.selected = replacement;
    }

    /// Keep the selected header inside the viewport
    pub fn scroll_to_selection(&mut self) {
        let total = self.outline().len();
        let height = self.viewport_height.max(1);
        if let Some(row) = self.selected_row() {
            if row < self.scroll_offset {
                self.scroll_offset = row;
            } else if row >= self.scroll_offset + height {
                self.scroll_offset = row + 1 - height;
            }
        }
        self.scroll_offset = self.scroll_offset.min(total.saturating_sub(1));
    }

    /// Click on a row of the tree panel, counted from the top of the viewport
    pub fn click_row(&mut self, row: u16) -> bool {
        let index = self.scroll_offset + row as usize;
        let id = self
            .outline()
            .get(index)
            .map(|line| line.node_id.to_string());
        let Some(id) = id else {
            return false;
        };
        let selection_changed = self.select(&id);
        let activated = self.activate(&id);
        selection_changed || activated
    }

    /// Mouse click in terminal coordinates
    pub fn click_at(&mut self, column: u16, row: u16) -> bool {
        let area = self.tree_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return false;
        }
        self.click_row(row - area.y)
    }

    /// Apply a command; returns true if anything visible changed
    pub fn apply(&mut self, command: &Command) -> bool {
        log::debug!("🎮 App::apply: {}", command);
        let changed = match command {
            Command::Quit => {
                self.should_quit = true;
                false
            }
            Command::Redraw => {
                self.force_redraw = true;
                self.status_message = "Screen refreshed".to_string();
                true
            }
            Command::Up => self.select_previous(),
            Command::Down => self.select_next(),
            Command::PageUp => self.page(false),
            Command::PageDown => self.page(true),
            Command::GoToTop => self.select_first(),
            Command::GoToBottom => self.select_last(),
            Command::Select(id) => self.select(id),
            Command::Toggle => self.toggle_selected(),
            Command::Expand => self.expand_selected(),
            Command::Collapse => self.collapse_selected(),
            Command::Activate(id) => self.activate(id),
            Command::Click { row } => self.click_row(*row),
            Command::Sequence(commands) => {
                let mut changed = false;
                for command in commands {
                    changed |= self.apply(command);
                    if self.should_quit {
                        break;
                    }
                }
                changed
            }
        };
        if changed {
            self.needs_redraw = true;
            self.scroll_to_selection();
        }
        changed
    }

    /// Whether the next tick has to draw; clears the pending request
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw) || self.force_redraw
    }
}
