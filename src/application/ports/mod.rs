//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_cue;
pub mod config;
pub mod enumerator;
pub mod preview;
pub mod recorder;
pub mod store;

// Re-export common types
pub use audio_cue::{AudioCue, AudioCueError, AudioCueType};
pub use config::ConfigStore;
pub use enumerator::{DeviceEnumerator, DeviceError};
pub use preview::PreviewSink;
pub use recorder::{RecordError, TrackRecorder, TrackSource};
pub use store::{NewResponse, ResponseStore, StoreError};
