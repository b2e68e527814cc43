use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::render::INDENT_WIDTH;
use crate::style::IconSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub icons: IconSet,
    pub keybindings: KeybindingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub indent_width: usize,
    pub show_header: bool,
    /// Maximum rows given to the principles panel
    pub principles_height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: char,
    pub toggle: char,
    pub up: char,
    pub down: char,
    pub expand: char,
    pub collapse: char,
    pub goto_top: char,
    pub goto_bottom: char,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent_width: INDENT_WIDTH,
            show_header: true,
            principles_height: 8,
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            toggle: ' ',
            up: 'k',
            down: 'j',
            expand: 'l',
            collapse: 'h',
            goto_top: 'g',
            goto_bottom: 'G',
        }
    }
}

impl Config {
    /// Read settings from a JSON file, or use the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_json::from_str(&content)?;
                log::info!("⚙️ Config::load: loaded settings from {:?}", path);
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
