//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Format elapsed recording time as mm:ss
    pub fn format_elapsed(&self, elapsed_secs: u64) -> String {
        format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
    }

    /// Show the recording timer spinner
    pub fn show_recording_timer(&mut self, question: &str) {
        self.start_spinner(&format!("Recording  {}  {}", "00:00".red(), question));
    }

    /// Update the recording timer
    pub fn update_recording_timer(&self, elapsed_secs: u64, question: &str) {
        self.update_spinner(&format!(
            "Recording  {}  {}",
            self.format_elapsed(elapsed_secs).red(),
            question
        ));
    }

    /// Print the question banner
    pub fn question(&self, index: usize, total: usize, text: &str) {
        println!();
        println!(
            "{} {}",
            format!("Question {}/{}:", index + 1, total).cyan().bold(),
            text.bold()
        );
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_elapsed_under_a_minute() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_elapsed(0), "00:00");
        assert_eq!(presenter.format_elapsed(9), "00:09");
        assert_eq!(presenter.format_elapsed(59), "00:59");
    }

    #[test]
    fn format_elapsed_over_a_minute() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_elapsed(60), "01:00");
        assert_eq!(presenter.format_elapsed(125), "02:05");
        assert_eq!(presenter.format_elapsed(3600), "60:00");
    }
}
