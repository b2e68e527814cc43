use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::App;
use crate::command::Command;
use crate::config::KeybindingConfig;

/// Returns true if the UI needs to be redrawn
pub fn handle_event(event: Event, app: &mut App) -> bool {
    match event {
        Event::Key(key) => match key_to_command(&key, &app.config.keybindings) {
            Some(command) => app.apply(&command),
            None => false,
        },
        Event::Mouse(mouse) => handle_mouse(mouse, app),
        Event::Resize(_, _) => true,
        _ => false,
    }
}

/// Translate a key press into a command using the configured bindings
pub fn key_to_command(key: &KeyEvent, bindings: &KeybindingConfig) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        // Ctrl+L to force screen redraw
        return match key.code {
            KeyCode::Char('l') => Some(Command::Redraw),
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Up => Some(Command::Up),
        KeyCode::Down => Some(Command::Down),
        KeyCode::Left => Some(Command::Collapse),
        KeyCode::Right => Some(Command::Expand),
        KeyCode::Enter => Some(Command::Toggle),
        KeyCode::Home => Some(Command::GoToTop),
        KeyCode::End => Some(Command::GoToBottom),
        KeyCode::PageUp => Some(Command::PageUp),
        KeyCode::PageDown => Some(Command::PageDown),
        KeyCode::Char(c) if c == bindings.quit => Some(Command::Quit),
        KeyCode::Char(c) if c == bindings.toggle => Some(Command::Toggle),
        KeyCode::Char(c) if c == bindings.up => Some(Command::Up),
        KeyCode::Char(c) if c == bindings.down => Some(Command::Down),
        KeyCode::Char(c) if c == bindings.expand => Some(Command::Expand),
        KeyCode::Char(c) if c == bindings.collapse => Some(Command::Collapse),
        KeyCode::Char(c) if c == bindings.goto_top => Some(Command::GoToTop),
        KeyCode::Char(c) if c == bindings.goto_bottom => Some(Command::GoToBottom),
        _ => None,
    }
}

fn handle_mouse(mouse: MouseEvent, app: &mut App) -> bool {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.apply(&Command::Down),
        MouseEventKind::ScrollUp => app.apply(&Command::Up),
        _ => false,
    }
}
