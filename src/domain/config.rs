//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Preferred camera device id (empty/None selects platform default)
    pub video_device: Option<String>,
    /// Preferred microphone device id
    pub audio_device: Option<String>,
    /// Directory for the response store and recorded artifacts
    pub data_dir: Option<String>,
    /// Play audio cues on record start/stop
    pub cue: Option<bool>,
    /// Path to a custom question list (one question per line)
    pub questions_file: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            video_device: Some(String::new()),
            audio_device: Some(String::new()),
            data_dir: None,
            cue: Some(false),
            questions_file: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            video_device: other.video_device.or(self.video_device),
            audio_device: other.audio_device.or(self.audio_device),
            data_dir: other.data_dir.or(self.data_dir),
            cue: other.cue.or(self.cue),
            questions_file: other.questions_file.or(self.questions_file),
        }
    }

    /// Get cue setting, or false if not set
    pub fn cue_or_default(&self) -> bool {
        self.cue.unwrap_or(false)
    }
}
