//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Rehearse - guided mock-interview practice with audio/video capture
#[derive(Parser, Debug)]
#[command(name = "rehearse")]
#[command(version)]
#[command(about = "Practice interview answers on camera, one question at a time")]
#[command(long_about = None)]
pub struct Cli {
    /// Camera device to record with (e.g., /dev/video0)
    #[arg(long, value_name = "DEVICE")]
    pub video_device: Option<String>,

    /// Microphone device to record with (cpal device name)
    #[arg(long, value_name = "DEVICE")]
    pub audio_device: Option<String>,

    /// Custom question list file (one question per line, # comments)
    #[arg(short = 'q', long, value_name = "FILE", env = "REHEARSE_QUESTIONS")]
    pub questions: Option<String>,

    /// Play audio cues when recording starts and stops
    #[arg(long)]
    pub cue: bool,

    /// Directory for the response store and recorded artifacts
    #[arg(long, value_name = "DIR", env = "REHEARSE_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Subcommand; without one, the interview wizard runs
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available cameras and microphones
    Devices,
    /// Show previously recorded responses
    Summary {
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "video_device",
    "audio_device",
    "data_dir",
    "cue",
    "questions_file",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["rehearse"]);
        assert!(cli.video_device.is_none());
        assert!(cli.audio_device.is_none());
        assert!(cli.questions.is_none());
        assert!(!cli.cue);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_device_overrides() {
        let cli = Cli::parse_from([
            "rehearse",
            "--video-device",
            "/dev/video1",
            "--audio-device",
            "USB Mic",
        ]);
        assert_eq!(cli.video_device, Some("/dev/video1".to_string()));
        assert_eq!(cli.audio_device, Some("USB Mic".to_string()));
    }

    #[test]
    fn cli_parses_questions_file() {
        let cli = Cli::parse_from(["rehearse", "-q", "questions.txt"]);
        assert_eq!(cli.questions, Some("questions.txt".to_string()));
    }

    #[test]
    fn cli_parses_devices_subcommand() {
        let cli = Cli::parse_from(["rehearse", "devices"]);
        assert!(matches!(cli.command, Some(Commands::Devices)));
    }

    #[test]
    fn cli_parses_summary_json() {
        let cli = Cli::parse_from(["rehearse", "summary", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Summary { json: true })));
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["rehearse", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["rehearse", "config", "set", "cue", "true"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "cue");
            assert_eq!(value, "true");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("video_device"));
        assert!(is_valid_config_key("cue"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
