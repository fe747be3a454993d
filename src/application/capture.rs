//! Capture session use case
//!
//! One session covers the bounded lifetime during which device streams
//! are held and one question's recording occurs. The session owns two
//! independent track recorders (video-only and audio-only) as children
//! and joins over both completion events on stop; the children are never
//! exposed directly.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::capture::{CaptureMachine, CaptureState, InvalidStateTransition};
use crate::domain::device::{DeviceDescriptor, DeviceKind, DeviceSelection};
use crate::domain::media::{CaptureResult, MediaKind, RecordingArtifact};

use super::ports::{DeviceError, PreviewSink, RecordError, TrackRecorder, TrackSource};

/// Errors from the capture session
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("Recording failed: {0}")]
    Record(#[from] RecordError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Capture session is closed")]
    SessionClosed,
}

/// The per-question capture pipeline.
///
/// Exactly one session is active at a time; the interview sequencer owns
/// the sole instance. Device streams are acquired on `open` and released
/// by `stop` or `dispose`, never held past the session's lifetime.
pub struct CaptureSession<S, P>
where
    S: TrackSource,
    P: PreviewSink,
{
    machine: CaptureMachine,
    selection: DeviceSelection,
    video: Option<Box<dyn TrackRecorder>>,
    audio: Option<Box<dyn TrackRecorder>>,
    source: Arc<S>,
    preview: Arc<P>,
}

impl<S, P> CaptureSession<S, P>
where
    S: TrackSource,
    P: PreviewSink,
{
    /// Open a session against the selected devices.
    ///
    /// Acquires a video-only track, then an audio-only track, and binds
    /// the live preview to the video device. No partial state is retained
    /// on failure: if the audio grant fails after the video grant
    /// succeeded, the video track is released before the error returns.
    pub async fn open(
        source: Arc<S>,
        preview: Arc<P>,
        selection: DeviceSelection,
    ) -> Result<Self, CaptureError> {
        let video = source
            .open_track(DeviceKind::Camera, &selection.video_device)
            .await?;

        let audio = match source
            .open_track(DeviceKind::Microphone, &selection.audio_device)
            .await
        {
            Ok(track) => track,
            Err(err) => {
                let mut video = video;
                video.release().await;
                return Err(err.into());
            }
        };

        preview
            .bind(&DeviceDescriptor::new(
                &selection.video_device,
                DeviceKind::Camera,
                "",
            ))
            .await;

        Ok(Self {
            machine: CaptureMachine::new(),
            selection,
            video: Some(video),
            audio: Some(audio),
            source,
            preview,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> CaptureState {
        self.machine.state()
    }

    pub fn is_recording(&self) -> bool {
        self.machine.is_recording()
    }

    /// The device selection this session was opened with
    pub fn selection(&self) -> &DeviceSelection {
        &self.selection
    }

    /// Begin recording on both tracks. Valid only from idle; calling
    /// `start` while already recording is an invalid-state error and
    /// does not acquire a second pair of streams.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.video.is_none() || self.audio.is_none() {
            return Err(CaptureError::SessionClosed);
        }
        self.machine.begin_start()?;

        let started = self.start_tracks().await;
        match started {
            Ok(()) => {
                self.machine.confirm_start()?;
                Ok(())
            }
            Err(err) => {
                // No half-recording sessions: release everything
                self.dispose().await;
                Err(err)
            }
        }
    }

    async fn start_tracks(&mut self) -> Result<(), CaptureError> {
        match self.video.as_mut() {
            Some(track) => track.start().await?,
            None => return Err(CaptureError::SessionClosed),
        }
        match self.audio.as_mut() {
            Some(track) => track.start().await?,
            None => return Err(CaptureError::SessionClosed),
        }
        Ok(())
    }

    /// Stop recording and assemble both artifacts.
    ///
    /// Resolves only after both recorders have flushed their final chunk;
    /// the wait is a join over the two completion futures, not a delay.
    /// A track that produced zero chunks yields an empty artifact,
    /// degraded but not fatal. The tracks are released before returning.
    pub async fn stop(&mut self) -> Result<CaptureResult, CaptureError> {
        self.machine.begin_stop()?;

        let (mut video, mut audio) = match (self.video.take(), self.audio.take()) {
            (Some(video), Some(audio)) => (video, audio),
            _ => {
                self.machine.reset();
                return Err(CaptureError::SessionClosed);
            }
        };

        let (video_chunks, audio_chunks) = tokio::join!(video.stop(), audio.stop());

        video.release().await;
        audio.release().await;
        self.preview.clear().await;
        self.machine.finish_stop()?;

        Ok(CaptureResult::new(
            RecordingArtifact::assemble(MediaKind::Video, video_chunks?),
            RecordingArtifact::assemble(MediaKind::Audio, audio_chunks?),
        ))
    }

    /// Swap one track's device while idle. Re-acquires that track and
    /// rebinds the preview for the video side; the other track's binding
    /// is untouched. Swapping mid-recording is an invalid-state error:
    /// an artifact must have an unambiguous device identity.
    pub async fn switch_device(
        &mut self,
        kind: DeviceKind,
        device_id: &str,
    ) -> Result<(), CaptureError> {
        if !self.machine.is_idle() {
            return Err(InvalidStateTransition {
                current_state: self.machine.state(),
                action: format!("switch {} device", kind),
            }
            .into());
        }

        let slot = match kind {
            DeviceKind::Camera => &mut self.video,
            DeviceKind::Microphone => &mut self.audio,
        };
        if let Some(mut old) = slot.take() {
            old.release().await;
        }

        let track = self.source.open_track(kind, device_id).await?;
        match kind {
            DeviceKind::Camera => self.video = Some(track),
            DeviceKind::Microphone => self.audio = Some(track),
        }
        self.selection = self.selection.with_device(kind, device_id);

        if kind == DeviceKind::Camera {
            self.preview
                .bind(&DeviceDescriptor::new(device_id, DeviceKind::Camera, ""))
                .await;
        }
        Ok(())
    }

    /// Release all held device streams unconditionally, from any state.
    /// The only operation safe to call from any state; idempotent. Any
    /// completion still in flight is discarded when its track handle is
    /// dropped, never applied to a later session.
    pub async fn dispose(&mut self) {
        if let Some(mut video) = self.video.take() {
            video.release().await;
        }
        if let Some(mut audio) = self.audio.take() {
            audio.release().await;
        }
        self.preview.clear().await;
        self.machine.reset();
    }
}
