//! Capture device value objects

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two kinds of capture device the interview uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Camera,
    Microphone,
}

impl DeviceKind {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Microphone => "microphone",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One enumerated capture device.
/// Immutable once enumerated; the set changes only by re-enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    id: String,
    kind: DeviceKind,
    label: String,
}

impl DeviceDescriptor {
    /// Create a descriptor. The label may be empty if the platform withheld it.
    pub fn new(id: impl Into<String>, kind: DeviceKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
        }
    }

    /// Opaque platform identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Human-readable label, falling back to a generic name when empty
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            match self.kind {
                DeviceKind::Camera => format!("Camera {}", self.id),
                DeviceKind::Microphone => format!("Microphone {}", self.id),
            }
        } else {
            self.label.clone()
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Explicit device selection passed into a capture session.
/// Empty ids select the platform default device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSelection {
    pub video_device: String,
    pub audio_device: String,
}

impl DeviceSelection {
    pub fn new(video_device: impl Into<String>, audio_device: impl Into<String>) -> Self {
        Self {
            video_device: video_device.into(),
            audio_device: audio_device.into(),
        }
    }

    /// Return a copy with the device for `kind` replaced
    pub fn with_device(&self, kind: DeviceKind, device_id: impl Into<String>) -> Self {
        let mut next = self.clone();
        match kind {
            DeviceKind::Camera => next.video_device = device_id.into(),
            DeviceKind::Microphone => next.audio_device = device_id.into(),
        }
        next
    }

    pub fn device_for(&self, kind: DeviceKind) -> &str {
        match kind {
            DeviceKind::Camera => &self.video_device,
            DeviceKind::Microphone => &self.audio_device,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(DeviceKind::Camera.to_string(), "camera");
        assert_eq!(DeviceKind::Microphone.to_string(), "microphone");
    }

    #[test]
    fn display_label_falls_back_to_id() {
        let dev = DeviceDescriptor::new("cam0", DeviceKind::Camera, "");
        assert_eq!(dev.display_label(), "Camera cam0");

        let mic = DeviceDescriptor::new("mic0", DeviceKind::Microphone, "USB Mic");
        assert_eq!(mic.display_label(), "USB Mic");
    }

    #[test]
    fn selection_with_device_replaces_one_side() {
        let sel = DeviceSelection::new("cam0", "mic0");
        let next = sel.with_device(DeviceKind::Microphone, "mic1");
        assert_eq!(next.video_device, "cam0");
        assert_eq!(next.audio_device, "mic1");
        // Original untouched
        assert_eq!(sel.audio_device, "mic0");
    }

    #[test]
    fn device_for_returns_matching_id() {
        let sel = DeviceSelection::new("cam0", "mic0");
        assert_eq!(sel.device_for(DeviceKind::Camera), "cam0");
        assert_eq!(sel.device_for(DeviceKind::Microphone), "mic0");
    }
}
