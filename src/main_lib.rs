// Library module containing testable functions from main.rs

use std::fs;
use std::path::Path;

use crate::app::App;
use crate::command::Command;
use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::executor::Executor;
use crate::expand_state::ExpandState;
use crate::render::{to_text, Renderer};
use crate::view_config::ViewConfig;

fn write_or_print(output_path: Option<&str>, content: &str, label: &str) -> Result<()> {
    match output_path {
        Some(path) => {
            fs::write(path, content)?;
            println!("{} saved to: {}", label, path);
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

/// Plain-text outline of a document under a given expand state
pub fn render_outline(document: &Document, expanded: &ExpandState, config: &Config) -> String {
    let renderer = Renderer::new(config.icons.provider())
        .with_indent_width(config.layout.indent_width);
    to_text(&renderer.render(&document.roots, expanded))
}

/// Print the outline; `expand` replaces the document's initial expand set when non-empty
pub fn print_outline(
    document_path: Option<&Path>,
    expand: &[String],
    config: &Config,
    output_path: Option<&str>,
) -> Result<()> {
    let document = Document::load(document_path)?;
    let expanded = if expand.is_empty() {
        ExpandState::with_expanded(document.expanded.iter().cloned())
    } else {
        ExpandState::with_expanded(expand.iter().cloned())
    };
    let outline = render_outline(&document, &expanded, config);
    match output_path {
        Some(path) => {
            fs::write(path, &outline)?;
            println!("Outline saved to: {}", path);
        }
        None => print!("{}", outline),
    }
    Ok(())
}

pub fn execute_command(
    config_path: &str,
    command_str: &str,
    settings: Config,
    output_path: Option<&str>,
    generate_screenshot: bool,
    width: u16,
    height: u16,
) -> Result<()> {
    let view = ViewConfig::load_from_file(config_path)?;
    let document = view.load_document()?;
    let command = Command::from_string(command_str)?;

    let result = Executor::execute(&view, document, settings.clone(), &command);

    let result_json = serde_json::to_string_pretty(&result.view)?;
    write_or_print(output_path, &result_json, "Result")?;

    eprintln!("Status: {}", result.view.status_message);
    if result.should_quit {
        eprintln!("Command resulted in quit");
    }

    if generate_screenshot {
        let screenshot_path = output_path
            .map(|p| format!("{}.screenshot.txt", p.trim_end_matches(".json")))
            .unwrap_or_else(|| "command_result_screenshot.txt".to_string());

        crate::screenshot::generate_screenshot(
            &result.view,
            settings,
            Some(&screenshot_path),
            width,
            height,
        )?;
    }

    Ok(())
}

/// Snapshot the initial view of a document without running the TUI
pub fn save_initial_state(
    document_path: Option<&Path>,
    config: Config,
    output_path: Option<&str>,
) -> Result<()> {
    let document = Document::load(document_path)?;
    let app = App::new(document, config).with_document_path(document_path.map(Path::to_path_buf));
    let view = ViewConfig::from_app(&app);

    let json = serde_json::to_string_pretty(&view)?;
    write_or_print(output_path, &json, "Current state")
}
