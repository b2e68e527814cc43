pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod executor;
pub mod expand_state;
pub mod main_lib;
pub mod render;
pub mod screenshot;
pub mod style;
pub mod test_runner;
pub mod ui;
pub mod view_config;
