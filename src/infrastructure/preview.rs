//! Preview sink adapters
//!
//! A terminal shell cannot render live frames, so the preview surface
//! degrades to a status line naming the bound camera. Binding and
//! clearing still follow the session lifecycle exactly.

use async_trait::async_trait;
use colored::Colorize;

use crate::application::ports::PreviewSink;
use crate::domain::device::DeviceDescriptor;

/// Terminal preview: prints which camera is live
pub struct TerminalPreview;

impl TerminalPreview {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPreview {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreviewSink for TerminalPreview {
    async fn bind(&self, device: &DeviceDescriptor) {
        println!(
            "{} {}",
            "● Camera live:".green(),
            device.display_label().bold()
        );
    }

    async fn clear(&self) {
        println!("{}", "○ Camera preview cleared".dimmed());
    }
}

/// Silent preview for headless runs and tests
pub struct NoopPreview;

impl NoopPreview {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopPreview {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreviewSink for NoopPreview {
    async fn bind(&self, _device: &DeviceDescriptor) {}

    async fn clear(&self) {}
}
