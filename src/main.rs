use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::{Path, PathBuf};
use std::{io, time::Duration};

use sop_tree::app::App;
use sop_tree::cli::{Cli, Commands};
use sop_tree::config::Config;
use sop_tree::document::Document;
use sop_tree::error::{Result, SopTreeError};
use sop_tree::style::IconSet;
use sop_tree::test_runner::TestRunner;
use sop_tree::view_config::ViewConfig;
use sop_tree::{event, main_lib, screenshot, ui};

fn main() -> Result<()> {
    // Initialize logger only if SOP_TREE_LOG environment variable is set
    if let Ok(log_file) = std::env::var("SOP_TREE_LOG") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        env_logger::Builder::new()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .filter_level(log::LevelFilter::Debug)
            .init();

        log::info!("SOP tree starting up");
    }

    let cli = Cli::parse();
    let mut settings = Config::load(cli.settings.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Run {
        document: None,
        ascii: false,
    });

    match command {
        Commands::Run { document, ascii } => {
            if ascii {
                settings.icons = IconSet::Ascii;
            }
            run_interactive(document, settings)
        }
        Commands::Render {
            document,
            expand,
            ascii,
            output,
        } => {
            if ascii {
                settings.icons = IconSet::Ascii;
            }
            main_lib::print_outline(document.as_deref(), &expand, &settings, output.as_deref())
        }
        Commands::Screenshot {
            config,
            output,
            width,
            height,
        } => {
            let view = ViewConfig::load_from_file(&config)?;
            screenshot::generate_screenshot(&view, settings, output.as_deref(), width, height)
        }
        Commands::Execute {
            config,
            command,
            output,
            screenshot,
            width,
            height,
        } => main_lib::execute_command(
            &config,
            &command,
            settings,
            output.as_deref(),
            screenshot,
            width,
            height,
        ),
        Commands::SaveState { document, output } => {
            main_lib::save_initial_state(document.as_deref(), settings, output.as_deref())
        }
        Commands::Test {
            script,
            config,
            overwrite,
            verbose,
        } => run_headless_test(&script, config.as_deref(), settings, overwrite, verbose),
    }
}

fn run_headless_test(
    script_path: &str,
    config_path: Option<&str>,
    settings: Config,
    overwrite: bool,
    verbose: bool,
) -> Result<()> {
    // Set up logging if verbose and no log file was requested
    if verbose && std::env::var("SOP_TREE_LOG").is_err() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    log::info!("🧪 Starting headless test run");
    log::info!("🧪 Script: {}", script_path);

    let mut app = match config_path {
        Some(config_path) => {
            log::info!("🧪 Config: {}", config_path);
            let view = ViewConfig::load_from_file(config_path)?;
            let document = view.load_document()?;
            App::from_view_config(&view, document, settings)
        }
        None => App::new(Document::builtin()?, settings),
    };

    let mut test_runner = TestRunner::from_file(script_path)?;
    test_runner.overwrite_mode = overwrite;
    test_runner.screenshot_base_dir = Path::new(script_path).parent().map(Path::to_path_buf);

    let test_result = test_runner.run(&mut app)?;
    test_result.print_summary();

    if test_result.success {
        log::info!("🧪 Test completed successfully");
        Ok(())
    } else {
        log::error!("🧪 Test failed");
        Err(SopTreeError::from("Test failed"))
    }
}

fn run_interactive(document_path: Option<PathBuf>, settings: Config) -> Result<()> {
    let document = Document::load(document_path.as_deref())?;
    let mut app = App::new(document, settings).with_document_path(document_path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    loop {
        if app.take_redraw() {
            // Handle forced screen redraw
            if app.force_redraw {
                terminal.clear()?;
                app.force_redraw = false;
            }
            terminal.draw(|f| ui::draw(f, app))?;
        }

        if crossterm::event::poll(tick_rate)? {
            let event = crossterm::event::read()?;
            if event::handle_event(event, app) {
                app.needs_redraw = true;
            }
        }

        if app.should_quit {
            log::info!("SOP tree shutting down");
            return Ok(());
        }
    }
}
