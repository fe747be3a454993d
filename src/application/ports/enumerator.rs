//! Device enumeration port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::device::{DeviceDescriptor, DeviceKind};

/// Device errors
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("Device unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to enumerate devices: {0}")]
    EnumerationFailed(String),
}

/// Port for listing available capture devices.
///
/// Enumeration does not request device permission; labels may be empty
/// until a grant has been given. Enumeration failure is recoverable:
/// the caller falls back to an empty list and prompts the user.
#[async_trait]
pub trait DeviceEnumerator: Send + Sync {
    /// Query the platform for currently available input devices
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, DeviceError>;

    /// First descriptor matching `kind` in enumeration order.
    /// Used to pre-seed selection before the user chooses explicitly.
    async fn default_for(&self, kind: DeviceKind) -> Result<Option<DeviceDescriptor>, DeviceError> {
        let devices = self.list_devices().await?;
        Ok(devices.into_iter().find(|d| d.kind() == kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDevices(Vec<DeviceDescriptor>);

    #[async_trait]
    impl DeviceEnumerator for FixedDevices {
        async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, DeviceError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn default_for_picks_first_of_kind_in_enumeration_order() {
        let enumerator = FixedDevices(vec![
            DeviceDescriptor::new("mic0", DeviceKind::Microphone, "Built-in Mic"),
            DeviceDescriptor::new("/dev/video0", DeviceKind::Camera, "Webcam A"),
            DeviceDescriptor::new("/dev/video2", DeviceKind::Camera, "Webcam B"),
        ]);

        let camera = enumerator
            .default_for(DeviceKind::Camera)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(camera.id(), "/dev/video0");

        let mic = enumerator
            .default_for(DeviceKind::Microphone)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mic.id(), "mic0");
    }

    #[tokio::test]
    async fn default_for_is_none_when_kind_absent() {
        let enumerator = FixedDevices(vec![DeviceDescriptor::new(
            "mic0",
            DeviceKind::Microphone,
            "",
        )]);
        let camera = enumerator.default_for(DeviceKind::Camera).await.unwrap();
        assert!(camera.is_none());
    }

    #[tokio::test]
    async fn default_for_propagates_enumeration_failure() {
        struct Broken;

        #[async_trait]
        impl DeviceEnumerator for Broken {
            async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, DeviceError> {
                Err(DeviceError::EnumerationFailed("backend gone".to_string()))
            }
        }

        let result = Broken.default_for(DeviceKind::Camera).await;
        assert!(matches!(result, Err(DeviceError::EnumerationFailed(_))));
    }
}
