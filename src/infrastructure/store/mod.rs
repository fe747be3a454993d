//! Persistence infrastructure adapters

mod sqlite;

pub use sqlite::SqliteResponseStore;
