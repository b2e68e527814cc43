use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::fs;

use crate::{app::App, config::Config, error::Result, ui, view_config::ViewConfig};

/// Draw the app once into an in-memory terminal and return the screen text
pub fn capture(app: &mut App, width: u16, height: u16) -> Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(|frame| {
        ui::draw(frame, app);
    })?;

    Ok(buffer_to_string(terminal.backend().buffer()))
}

pub fn generate_screenshot(
    view: &ViewConfig,
    config: Config,
    output_path: Option<&str>,
    width: u16,
    height: u16,
) -> Result<()> {
    let document = view.load_document()?;
    let mut app = App::from_view_config(view, document, config);

    let screenshot = capture(&mut app, width, height)?;

    match output_path {
        Some(path) => {
            fs::write(path, screenshot)?;
            println!("Screenshot saved to: {}", path);
        }
        None => {
            print!("{}", screenshot);
        }
    }

    Ok(())
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            let cell = &buffer[(x, y)];
            let sym = cell.symbol();

            // Use a space for empty cells to make output more readable
            if sym.is_empty() {
                result.push(' ');
            } else {
                result.push_str(sym);
            }
        }
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_buffer_to_string() {
        let backend = TestBackend::new(10, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                use ratatui::{
                    text::Text,
                    widgets::{Block, Borders, Paragraph},
                };

                let paragraph =
                    Paragraph::new(Text::from("Test")).block(Block::default().borders(Borders::ALL));
                frame.render_widget(paragraph, frame.area());
            })
            .unwrap();

        let result = buffer_to_string(terminal.backend().buffer());

        assert!(result.contains("Test"));
        assert_eq!(result.lines().count(), 3);
    }

    #[test]
    fn test_generate_screenshot_to_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("shot.txt");
        let output_str = output.to_string_lossy().to_string();

        generate_screenshot(&ViewConfig::default(), Config::default(), Some(&output_str), 100, 40)
            .unwrap();

        let screen = fs::read_to_string(&output).unwrap();
        assert!(screen.contains("STAGE 1: Intake & Document Collection"));
        assert_eq!(screen.lines().count(), 40);
    }
}
