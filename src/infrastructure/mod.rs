//! Infrastructure layer containing adapter implementations

pub mod audio_cue;
pub mod config;
pub mod media;
pub mod preview;
pub mod store;
