//! Response persistence port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::interview::ResponseRecord;
use crate::domain::media::CaptureResult;

/// Persistence errors. Surfaced to the user as "could not save/load";
/// never loses already-captured in-memory artifacts.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Failed to open response store: {0}")]
    Open(String),

    #[error("Failed to save response: {0}")]
    Append(String),

    #[error("Failed to load responses: {0}")]
    List(String),
}

/// A completed response ready to be persisted
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub question: String,
    pub text_response: String,
    pub capture: CaptureResult,
}

impl NewResponse {
    pub fn new(question: impl Into<String>, capture: CaptureResult) -> Self {
        Self {
            question: question.into(),
            // Text responses are not collected in this version; the field
            // is kept for record-store schema stability.
            text_response: String::new(),
            capture,
        }
    }
}

/// Port for the append-only response store.
///
/// Records are keyed by an auto-generated, monotonically increasing
/// identifier and survive restarts. Underlying storage is created on
/// first use.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Persist one response; returns the full record including its id
    async fn append(&self, response: NewResponse) -> Result<ResponseRecord, StoreError>;

    /// All persisted responses, ordered by identifier ascending
    async fn list_all(&self) -> Result<Vec<ResponseRecord>, StoreError>;
}
