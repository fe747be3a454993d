//! Media capture adapters (camera and microphone)

pub mod cpal_audio;
pub mod ffmpeg;

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{DeviceEnumerator, DeviceError, TrackRecorder, TrackSource};
use crate::domain::device::{DeviceDescriptor, DeviceKind};

pub use cpal_audio::CpalAudioTrack;
pub use ffmpeg::FfmpegVideoTrack;

/// The real device gateway: cameras via FFmpeg, microphones via cpal
#[derive(Clone)]
pub struct SystemMediaGateway;

impl SystemMediaGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl DeviceEnumerator for SystemMediaGateway {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, DeviceError> {
        let mut devices = ffmpeg::list_cameras().await?;

        // cpal enumeration is blocking
        let mics = tokio::task::spawn_blocking(cpal_audio::list_microphones)
            .await
            .map_err(|e| DeviceError::EnumerationFailed(format!("Task join error: {}", e)))??;
        devices.extend(mics);

        Ok(devices)
    }
}

#[async_trait]
impl TrackSource for SystemMediaGateway {
    async fn open_track(
        &self,
        kind: DeviceKind,
        device_id: &str,
    ) -> Result<Box<dyn TrackRecorder>, DeviceError> {
        match kind {
            DeviceKind::Camera => {
                let track = FfmpegVideoTrack::open(device_id).await?;
                Ok(Box::new(track))
            }
            DeviceKind::Microphone => {
                let id = device_id.to_string();
                let track = tokio::task::spawn_blocking(move || CpalAudioTrack::open(&id))
                    .await
                    .map_err(|e| {
                        DeviceError::Unavailable(format!("Task join error: {}", e))
                    })??;
                Ok(Box::new(track))
            }
        }
    }
}
