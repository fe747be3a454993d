//! Track acquisition and recording port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::device::DeviceKind;
use crate::domain::media::{MediaChunk, MediaKind};

use super::enumerator::DeviceError;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Failed to flush recording: {0}")]
    FlushFailed(String),
}

/// Port for acquiring device tracks.
///
/// Each acquired track is an exclusive grant on one device; the caller
/// owns the returned recorder and is responsible for releasing it.
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Acquire a single-device track. An empty `device_id` selects the
    /// platform default device of that kind. Fails with
    /// `DeviceError::Unavailable` if the grant is denied or the device
    /// disappeared mid-request.
    async fn open_track(
        &self,
        kind: DeviceKind,
        device_id: &str,
    ) -> Result<Box<dyn TrackRecorder>, DeviceError>;
}

/// One live device track with its recorder.
///
/// Produces a finite, append-only sequence of media chunks, in capture
/// order, terminated by the stop signal. `stop` resolves only after the
/// final chunk has been flushed.
#[async_trait]
pub trait TrackRecorder: Send {
    /// Media kind of this track's artifact
    fn media_kind(&self) -> MediaKind;

    /// The device id this track was opened against
    fn device_id(&self) -> &str;

    /// Begin accumulating chunks
    async fn start(&mut self) -> Result<(), RecordError>;

    /// Stop and flush. Returns the ordered chunk sequence; an empty
    /// sequence means the device produced no data (degraded, not fatal).
    async fn stop(&mut self) -> Result<Vec<MediaChunk>, RecordError>;

    /// Release the underlying device unconditionally. Safe from any
    /// state, idempotent, never fails. Pending completions after release
    /// are discarded, not applied.
    async fn release(&mut self);
}
