//! Live preview port interface

use async_trait::async_trait;

use crate::domain::device::DeviceDescriptor;

/// Port for the shared video preview sink.
///
/// Written by whichever capture session currently owns the video track.
/// Rebinding is atomic from the caller's perspective: a brief blank is
/// acceptable, a stale frame from the previous device is not.
#[async_trait]
pub trait PreviewSink: Send + Sync {
    /// Bind the preview to a live video device
    async fn bind(&self, device: &DeviceDescriptor);

    /// Clear the preview. Best-effort, never fails.
    async fn clear(&self);
}
