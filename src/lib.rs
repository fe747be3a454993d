//! Rehearse - guided mock-interview practice on camera
//!
//! Walks through a fixed question list, recording a camera and a
//! microphone track for each answer and persisting the results locally.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (FFmpeg, cpal, SQLite, etc.)
//! - **CLI**: Command-line interface, argument parsing, and the wizard

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
