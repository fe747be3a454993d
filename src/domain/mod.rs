//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod device;
pub mod error;
pub mod interview;
pub mod media;

// Re-export common types
pub use capture::{CaptureMachine, CaptureState, InvalidStateTransition};
pub use config::AppConfig;
pub use device::{DeviceDescriptor, DeviceKind, DeviceSelection};
pub use error::ConfigError;
pub use interview::{default_questions, parse_questions, QuestionListError, ResponseRecord};
pub use media::{CaptureResult, MediaChunk, MediaKind, RecordingArtifact};
