//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the interview
//! wizard runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{
    run_devices, run_interview, run_summary, RunOptions, EXIT_ERROR, EXIT_SUCCESS,
    EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction};
pub use presenter::Presenter;
