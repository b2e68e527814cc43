use crate::{
    app::App, command::Command, config::Config, document::Document, view_config::ViewConfig,
};

/// Result of executing a command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub view: ViewConfig,
    pub changed: bool,
    pub should_quit: bool,
}

/// Executes commands against view snapshots
pub struct Executor;

impl Executor {
    /// Execute a command against a snapshot and return the resulting snapshot
    pub fn execute(
        view: &ViewConfig,
        document: Document,
        config: Config,
        command: &Command,
    ) -> ExecutionResult {
        let mut app = App::from_view_config(view, document, config);
        let changed = app.apply(command);
        if app.should_quit {
            app.status_message = "Goodbye!".to_string();
        }

        ExecutionResult {
            view: ViewConfig::from_app(&app),
            changed,
            should_quit: app.should_quit,
        }
    }
}
