//! Application layer containing use cases and port interfaces

pub mod capture;
pub mod ports;
pub mod sequencer;

pub use capture::{CaptureError, CaptureSession};
pub use sequencer::{AdvanceOutcome, Advanced, InterviewSequencer, SequencerError};
