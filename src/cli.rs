use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sop-tree")]
#[command(about = "A TUI for browsing standard operating procedures as a collapsible tree")]
pub struct Cli {
    /// Settings file (layout, icons, keybindings)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive TUI (default)
    Run {
        /// Procedure document to open (defaults to the built-in SOP)
        document: Option<PathBuf>,
        /// Use ASCII icons instead of Unicode symbols
        #[arg(long)]
        ascii: bool,
    },
    /// Print the outline as plain text
    Render {
        /// Procedure document to render (defaults to the built-in SOP)
        document: Option<PathBuf>,
        /// Node ids to expand, replacing the document's initial set
        #[arg(short, long, value_delimiter = ',')]
        expand: Vec<String>,
        /// Use ASCII icons instead of Unicode symbols
        #[arg(long)]
        ascii: bool,
        /// Output file for the outline (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Generate a screenshot from a JSON view configuration
    Screenshot {
        /// Path to the JSON view configuration file
        #[arg(short, long)]
        config: String,
        /// Output file for the screenshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Terminal width for rendering
        #[arg(long, default_value = "120")]
        width: u16,
        /// Terminal height for rendering
        #[arg(long, default_value = "40")]
        height: u16,
    },
    /// Execute a command against a view configuration and output the result
    Execute {
        /// Path to the JSON view configuration file
        #[arg(short, long)]
        config: String,
        /// Command to execute (e.g., "down", "toggle", "activate:phase2")
        #[arg(short = 'x', long)]
        command: String,
        /// Output file for the resulting configuration (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Also generate a screenshot of the result
        #[arg(long)]
        screenshot: bool,
        /// Terminal width for screenshot (if enabled)
        #[arg(long, default_value = "120")]
        width: u16,
        /// Terminal height for screenshot (if enabled)
        #[arg(long, default_value = "40")]
        height: u16,
    },
    /// Save the initial view of a document to JSON without running the TUI
    SaveState {
        /// Procedure document (defaults to the built-in SOP)
        document: Option<PathBuf>,
        /// Output file for the configuration (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run a headless test script
    Test {
        /// Path to the test script file
        #[arg(short, long)]
        script: String,
        /// Optional view configuration to start from
        #[arg(short, long)]
        config: Option<String>,
        /// Write screenshots instead of verifying them
        #[arg(long)]
        overwrite: bool,
        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_no_subcommand() {
        let cli = Cli::try_parse_from(["sop-tree"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.settings.is_none());
    }

    #[test]
    fn test_render_expand_list() {
        let cli =
            Cli::try_parse_from(["sop-tree", "render", "--expand", "root,phase2", "--ascii"])
                .unwrap();
        match cli.command {
            Some(Commands::Render {
                document,
                expand,
                ascii,
                output,
            }) => {
                assert!(document.is_none());
                assert_eq!(expand, vec!["root".to_string(), "phase2".to_string()]);
                assert!(ascii);
                assert!(output.is_none());
            }
            _ => panic!("expected render subcommand"),
        }
    }

    #[test]
    fn test_execute_requires_command() {
        assert!(Cli::try_parse_from(["sop-tree", "execute", "-c", "view.json"]).is_err());

        let cli = Cli::try_parse_from(["sop-tree", "execute", "-c", "view.json", "-x", "down"])
            .unwrap();
        match cli.command {
            Some(Commands::Execute {
                command, width, ..
            }) => {
                assert_eq!(command, "down");
                assert_eq!(width, 120);
            }
            _ => panic!("expected execute subcommand"),
        }
    }
}
