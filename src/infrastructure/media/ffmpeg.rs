//! Camera track adapter using an FFmpeg subprocess
//!
//! FFmpeg records the camera to a temp file; stop sends SIGINT so the
//! container is finalized, then reads the file back as one chunk.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
use tokio::fs;
use tokio::process::{Child, Command};

use crate::application::ports::{DeviceError, RecordError, TrackRecorder};
use crate::domain::device::{DeviceDescriptor, DeviceKind};
use crate::domain::media::{MediaChunk, MediaKind};

/// List available cameras.
///
/// On Linux this scans the video4linux device nodes; labels come from
/// sysfs when readable.
pub async fn list_cameras() -> Result<Vec<DeviceDescriptor>, DeviceError> {
    #[cfg(target_os = "linux")]
    {
        let mut cameras = Vec::new();
        let mut entries = fs::read_dir("/dev")
            .await
            .map_err(|e| DeviceError::EnumerationFailed(e.to_string()))?;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(index) = name.strip_prefix("video") {
                if index.chars().all(|c| c.is_ascii_digit()) {
                    let id = format!("/dev/{}", name);
                    let label = fs::read_to_string(format!(
                        "/sys/class/video4linux/{}/name",
                        name
                    ))
                    .await
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
                    cameras.push(DeviceDescriptor::new(id, DeviceKind::Camera, label));
                }
            }
        }

        cameras.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(cameras)
    }

    #[cfg(not(target_os = "linux"))]
    {
        // Other platforms expose cameras through FFmpeg by index
        Ok(vec![DeviceDescriptor::new("0", DeviceKind::Camera, "")])
    }
}

/// Temp file for the in-flight recording
struct TempVideoFile {
    path: PathBuf,
}

impl TempVideoFile {
    fn new() -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            path: std::env::temp_dir().join(format!("rehearse-{}.webm", timestamp)),
        }
    }
}

impl Drop for TempVideoFile {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = std::fs::remove_file(&self.path);
    }
}

/// One exclusive camera grant backed by an FFmpeg child process
pub struct FfmpegVideoTrack {
    device_id: String,
    process: Option<Child>,
    output: TempVideoFile,
}

impl FfmpegVideoTrack {
    /// Acquire the camera grant. Verifies the device node exists now so
    /// a missing camera fails the grant, not the start.
    pub async fn open(device_id: &str) -> Result<Self, DeviceError> {
        let device_id = if device_id.is_empty() {
            Self::default_device().await?
        } else {
            device_id.to_string()
        };

        #[cfg(target_os = "linux")]
        if !Path::new(&device_id).exists() {
            return Err(DeviceError::Unavailable(format!(
                "camera '{}' not found",
                device_id
            )));
        }

        Ok(Self {
            device_id,
            process: None,
            output: TempVideoFile::new(),
        })
    }

    async fn default_device() -> Result<String, DeviceError> {
        let cameras = list_cameras().await?;
        cameras
            .into_iter()
            .next()
            .map(|d| d.id().to_string())
            .ok_or_else(|| DeviceError::Unavailable("no camera found".to_string()))
    }

    /// FFmpeg args for a low-resolution preview-quality capture
    fn build_ffmpeg_args(device_id: &str, output_path: &Path) -> Vec<String> {
        let mut args = Vec::new();

        #[cfg(target_os = "linux")]
        args.extend(["-f".to_string(), "v4l2".to_string()]);
        #[cfg(target_os = "macos")]
        args.extend(["-f".to_string(), "avfoundation".to_string()]);

        args.extend([
            "-framerate".to_string(),
            "30".to_string(),
            "-video_size".to_string(),
            "320x240".to_string(),
            "-i".to_string(),
            device_id.to_string(),
            "-c:v".to_string(),
            "libvpx".to_string(),
            "-b:v".to_string(),
            "1M".to_string(),
            "-an".to_string(), // audio is a separate track
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ]);

        args
    }

    #[cfg(unix)]
    fn send_signal(child: &Child, sig: Signal) -> Result<(), RecordError> {
        if let Some(id) = child.id() {
            signal::kill(Pid::from_raw(id as i32), sig)
                .map_err(|e| RecordError::FlushFailed(format!("Signal failed: {}", e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl TrackRecorder for FfmpegVideoTrack {
    fn media_kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn start(&mut self) -> Result<(), RecordError> {
        if self.process.is_some() {
            return Err(RecordError::StartFailed(
                "Recording already in progress".to_string(),
            ));
        }

        let args = Self::build_ffmpeg_args(&self.device_id, &self.output.path);
        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecordError::StartFailed("ffmpeg not found in PATH".to_string())
                } else {
                    RecordError::StartFailed(e.to_string())
                }
            })?;

        self.process = Some(child);
        Ok(())
    }

    async fn stop(&mut self) -> Result<Vec<MediaChunk>, RecordError> {
        let child = match self.process.take() {
            Some(child) => child,
            None => return Ok(Vec::new()),
        };

        // SIGINT lets FFmpeg finalize the container before exiting
        #[cfg(unix)]
        Self::send_signal(&child, Signal::SIGINT)?;
        let _ = child.wait_with_output().await;

        // A missing or empty file is a degraded track, not a failure
        match fs::read(&self.output.path).await {
            Ok(data) if !data.is_empty() => Ok(vec![MediaChunk::new(data)]),
            _ => Ok(Vec::new()),
        }
    }

    async fn release(&mut self) {
        if let Some(child) = self.process.take() {
            #[cfg(unix)]
            let _ = Self::send_signal(&child, Signal::SIGKILL);
            let _ = child.wait_with_output().await;
        }
        let _ = fs::remove_file(&self.output.path).await;
    }
}
