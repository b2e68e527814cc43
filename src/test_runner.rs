use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app::App;
use crate::command::Command;
use crate::error::{Result, SopTreeError};
use crate::event::handle_event;

/// Test file format for headless testing
///
/// Format is a simple text file where each line represents a command:
/// - `key:<keyname>` - Send a key event (e.g., `key:down`, `key:enter`, `key:q`)
/// - `char:<c>` - Send a character (e.g., `char:j`, `char: `)
/// - `click:<row>` - Click a row of the tree panel, counted from its top
/// - `command:<command>` - Apply a named command (e.g., `command:activate:phase2`)
/// - `assert:<property>:<value>` - Assert view state
/// - `screenshot:<file>` - Verify (or with overwrite mode, write) a screenshot
/// - `# comment` - Comments (ignored)
///
/// Examples:
/// ```text
/// # Open the second stage
/// key:down
/// command:activate:phase2
/// assert:expanded:phase2=true
/// assert:visible:step2.1=true
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestCommand {
    Key(String),
    Char(char),
    Click(u16),
    Command(Command),
    Assert(String),
    Screenshot(String),
}

#[derive(Debug, Clone)]
pub struct TestRunner {
    pub commands: Vec<TestCommand>,
    pub overwrite_mode: bool,
    pub screenshot_base_dir: Option<PathBuf>,
    pub screenshot_size: (u16, u16),
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    pub fn new() -> Self {
        TestRunner {
            commands: Vec::new(),
            overwrite_mode: false,
            screenshot_base_dir: None,
            screenshot_size: (100, 30),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_string(&content)
    }

    pub fn from_string(content: &str) -> Result<Self> {
        let mut commands = Vec::new();

        for (line_num, raw) in content.lines().enumerate() {
            let line = raw.trim();
            let script_error = |message: String| SopTreeError::Script {
                line: line_num + 1,
                message,
            };

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let command = if let Some(key) = line.strip_prefix("key:") {
                TestCommand::Key(key.to_string())
            } else if let Some(value) = raw.trim_start().strip_prefix("char:") {
                // Keep a literal space after `char:`
                let ch = value
                    .chars()
                    .next()
                    .ok_or_else(|| script_error("empty character command".to_string()))?;
                TestCommand::Char(ch)
            } else if let Some(row) = line.strip_prefix("click:") {
                let row = row
                    .parse::<u16>()
                    .map_err(|_| script_error(format!("invalid row: {}", row)))?;
                TestCommand::Click(row)
            } else if let Some(command) = line.strip_prefix("command:") {
                TestCommand::Command(
                    Command::from_string(command).map_err(|e| script_error(e.to_string()))?,
                )
            } else if let Some(assertion) = line.strip_prefix("assert:") {
                TestCommand::Assert(assertion.to_string())
            } else if let Some(file) = line.strip_prefix("screenshot:") {
                TestCommand::Screenshot(file.to_string())
            } else {
                return Err(script_error(format!("invalid command: {}", line)));
            };

            commands.push(command);
        }

        Ok(TestRunner {
            commands,
            ..Self::new()
        })
    }

    pub fn run(&self, app: &mut App) -> Result<TestResult> {
        let start_time = Instant::now();
        let mut events_processed = 0;
        let mut assertions_passed = 0;
        let mut assertions_failed = 0;
        let mut errors = Vec::new();

        log::info!("🧪 Starting test run with {} commands", self.commands.len());

        for (index, command) in self.commands.iter().enumerate() {
            log::debug!("🧪 Executing command {}: {:?}", index, command);

            match command {
                TestCommand::Key(name) => {
                    let event = parse_key_event(name)?;
                    handle_event(event, app);
                    events_processed += 1;
                }
                TestCommand::Char(ch) => {
                    let event = Event::Key(KeyEvent::new(KeyCode::Char(*ch), KeyModifiers::NONE));
                    handle_event(event, app);
                    events_processed += 1;
                }
                TestCommand::Click(row) => {
                    app.click_row(*row);
                    events_processed += 1;
                }
                TestCommand::Command(command) => {
                    app.apply(command);
                    events_processed += 1;
                }
                TestCommand::Assert(assertion) => match evaluate_assertion(app, assertion) {
                    Ok(true) => {
                        assertions_passed += 1;
                        log::debug!("🧪 Assertion passed: {}", assertion);
                    }
                    Ok(false) => {
                        assertions_failed += 1;
                        errors.push(format!("Assertion failed: {}", assertion));
                    }
                    Err(e) => {
                        assertions_failed += 1;
                        errors.push(format!("Assertion error: {}", e));
                    }
                },
                TestCommand::Screenshot(file) => {
                    if let Err(e) = self.take_screenshot(app, file) {
                        errors.push(format!("Screenshot failed: {}", e));
                    }
                }
            }
        }

        let duration = start_time.elapsed();
        log::info!("🧪 Test run completed in {:?}", duration);

        let success = assertions_failed == 0 && errors.is_empty();
        Ok(TestResult {
            duration,
            events_processed,
            assertions_passed,
            assertions_failed,
            errors,
            success,
        })
    }

    fn take_screenshot(&self, app: &mut App, filename: &str) -> Result<()> {
        let (width, height) = self.screenshot_size;
        let content = crate::screenshot::capture(app, width, height)?;

        let final_path = match &self.screenshot_base_dir {
            Some(base_dir) => base_dir.join(filename),
            None => PathBuf::from(filename),
        };

        if self.overwrite_mode {
            std::fs::write(&final_path, content)?;
            println!("📸 Screenshot saved to: {}", final_path.display());
            return Ok(());
        }

        match std::fs::read_to_string(&final_path) {
            Ok(existing) if existing == content => {
                println!("✅ Screenshot verification passed: {}", final_path.display());
                Ok(())
            }
            Ok(_) => Err(SopTreeError::Generic(format!(
                "{} differs from the current screen. Use --overwrite to update.",
                final_path.display()
            ))),
            Err(_) => Err(SopTreeError::Generic(format!(
                "{} does not exist. Use --overwrite to create.",
                final_path.display()
            ))),
        }
    }
}

pub fn parse_key_event(key_str: &str) -> Result<Event> {
    let key_code = match key_str.to_lowercase().as_str() {
        "tab" => KeyCode::Tab,
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            // Single characters keep their case (`G` differs from `g`)
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => return Err(SopTreeError::Generic(format!("Unknown key: {}", key_str))),
            }
        }
    };

    Ok(Event::Key(KeyEvent::new(key_code, KeyModifiers::NONE)))
}

fn parse_bool(property: &str, value: &str) -> Result<bool> {
    value
        .parse::<bool>()
        .map_err(|_| SopTreeError::Generic(format!("{} expects boolean value", property)))
}

/// `<id>=<bool>` pairs used by the per-node assertions
fn parse_id_flag<'a>(property: &str, value: &'a str) -> Result<(&'a str, bool)> {
    let (id, flag) = value
        .rsplit_once('=')
        .ok_or_else(|| SopTreeError::Generic(format!("{} expects <id>=<bool>", property)))?;
    Ok((id, parse_bool(property, flag)?))
}

pub fn evaluate_assertion(app: &App, assertion: &str) -> Result<bool> {
    let (property, expected) = assertion.split_once(':').ok_or_else(|| {
        SopTreeError::Generic("Assertion must be in format 'property:value'".to_string())
    })?;

    match property {
        "should_quit" => Ok(app.should_quit == parse_bool(property, expected)?),
        "status_contains" => Ok(app.status_message.contains(expected)),
        "selected" => match app.selected.as_deref() {
            Some(id) => Ok(id == expected),
            None => Ok(expected == "none" || expected.is_empty()),
        },
        "expanded" => {
            let (id, flag) = parse_id_flag(property, expected)?;
            Ok(app.expand_state.is_expanded(id) == flag)
        }
        "visible" => {
            let (id, flag) = parse_id_flag(property, expected)?;
            Ok(app.visible_ids().contains(&id) == flag)
        }
        "visible_count" => {
            let count = expected.parse::<usize>().map_err(|_| {
                SopTreeError::Generic("visible_count expects numeric value".to_string())
            })?;
            Ok(app.visible_ids().len() == count)
        }
        "scroll_offset" => {
            let offset = expected.parse::<usize>().map_err(|_| {
                SopTreeError::Generic("scroll_offset expects numeric value".to_string())
            })?;
            Ok(app.scroll_offset == offset)
        }
        _ => Err(SopTreeError::Generic(format!(
            "Unknown assertion property: {}",
            property
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct TestResult {
    pub duration: Duration,
    pub events_processed: usize,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    pub errors: Vec<String>,
    pub success: bool,
}

impl TestResult {
    pub fn print_summary(&self) {
        println!("🧪 Test Results:");
        println!("   Duration: {:?}", self.duration);
        println!("   Events processed: {}", self.events_processed);
        println!("   Assertions passed: {}", self.assertions_passed);
        println!("   Assertions failed: {}", self.assertions_failed);

        if !self.errors.is_empty() {
            println!("   Errors:");
            for error in &self.errors {
                println!("     - {}", error);
            }
        }

        if self.success {
            println!("   Status: ✅ PASSED");
        } else {
            println!("   Status: ❌ FAILED");
        }
    }
}
