//! End-to-end interview flow tests
//!
//! Drives the sequencer and capture sessions with mock device tracks
//! against a real SQLite store in a temp directory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use rehearse::application::ports::{
    DeviceError, PreviewSink, RecordError, ResponseStore, TrackRecorder, TrackSource,
};
use rehearse::application::{AdvanceOutcome, InterviewSequencer};
use rehearse::domain::device::{DeviceDescriptor, DeviceKind, DeviceSelection};
use rehearse::domain::media::{MediaChunk, MediaKind};
use rehearse::infrastructure::preview::NoopPreview;
use rehearse::infrastructure::store::SqliteResponseStore;

/// Counts grants and releases so tests can assert device hygiene
#[derive(Default)]
struct Probe {
    opened: AtomicUsize,
    released: AtomicUsize,
}

struct FakeTrack {
    kind: DeviceKind,
    device_id: String,
    payload: Vec<u8>,
    probe: Arc<Probe>,
}

#[async_trait]
impl TrackRecorder for FakeTrack {
    fn media_kind(&self) -> MediaKind {
        match self.kind {
            DeviceKind::Camera => MediaKind::Video,
            DeviceKind::Microphone => MediaKind::Audio,
        }
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn start(&mut self) -> Result<(), RecordError> {
        Ok(())
    }

    async fn stop(&mut self) -> Result<Vec<MediaChunk>, RecordError> {
        Ok(vec![MediaChunk::new(self.payload.clone())])
    }

    async fn release(&mut self) {
        self.probe.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeSource {
    probe: Arc<Probe>,
}

#[async_trait]
impl TrackSource for FakeSource {
    async fn open_track(
        &self,
        kind: DeviceKind,
        device_id: &str,
    ) -> Result<Box<dyn TrackRecorder>, DeviceError> {
        self.probe.opened.fetch_add(1, Ordering::SeqCst);
        let payload = match kind {
            DeviceKind::Camera => b"video-frame".to_vec(),
            DeviceKind::Microphone => b"audio-frame".to_vec(),
        };
        Ok(Box::new(FakeTrack {
            kind,
            device_id: device_id.to_string(),
            payload,
            probe: Arc::clone(&self.probe),
        }))
    }
}

struct SilentPreview;

#[async_trait]
impl PreviewSink for SilentPreview {
    async fn bind(&self, _device: &DeviceDescriptor) {}
    async fn clear(&self) {}
}

fn questions(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Question {}?", i)).collect()
}

async fn run_full_interview(
    questions: Vec<String>,
    store: SqliteResponseStore,
    probe: Arc<Probe>,
) -> Vec<rehearse::domain::interview::ResponseRecord> {
    let mut sequencer = InterviewSequencer::new(
        questions,
        DeviceSelection::new("cam0", "mic0"),
        Arc::new(FakeSource {
            probe: Arc::clone(&probe),
        }),
        Arc::new(SilentPreview),
        store,
    )
    .expect("sequencer");

    loop {
        if sequencer.session_mut().is_none() {
            sequencer.open_session().await.expect("open session");
        }
        let session = sequencer.session_mut().expect("session");
        session.start().await.expect("start");
        let result = session.stop().await.expect("stop");

        let advanced = sequencer.advance(result).await.expect("advance");
        assert!(advanced.store_warning.is_none());
        if let AdvanceOutcome::Complete { responses } = advanced.outcome {
            return responses;
        }
    }
}

#[tokio::test]
async fn full_interview_persists_every_response_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteResponseStore::open(dir.path()).await.expect("store");
    let probe = Arc::new(Probe::default());

    let responses = run_full_interview(questions(3), store, Arc::clone(&probe)).await;

    assert_eq!(responses.len(), 3);
    for (i, record) in responses.iter().enumerate() {
        assert_eq!(record.question, format!("Question {}?", i + 1));
        assert!(record.id.is_some());
    }

    // Re-open the store: records survive and stay in question order
    let store = SqliteResponseStore::open(dir.path()).await.expect("store");
    let persisted = store.list_all().await.expect("list");
    assert_eq!(persisted.len(), 3);
    assert_eq!(persisted[0].question, "Question 1?");
    assert_eq!(persisted[2].question, "Question 3?");
    assert!(persisted[0].id < persisted[2].id);
    assert!(persisted[0].created_at <= persisted[1].created_at);
    assert!(persisted[1].created_at <= persisted[2].created_at);
}

#[tokio::test]
async fn every_grant_is_released_by_the_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteResponseStore::open(dir.path()).await.expect("store");
    let probe = Arc::new(Probe::default());

    run_full_interview(questions(2), store, Arc::clone(&probe)).await;

    let opened = probe.opened.load(Ordering::SeqCst);
    let released = probe.released.load(Ordering::SeqCst);
    // Two tracks per question
    assert_eq!(opened, 4);
    assert_eq!(opened, released);
}

#[tokio::test]
async fn artifact_files_contain_the_captured_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteResponseStore::open(dir.path()).await.expect("store");
    let probe = Arc::new(Probe::default());

    let responses = run_full_interview(questions(1), store, probe).await;

    let record = &responses[0];
    let video = std::fs::read(dir.path().join(&record.video_file)).expect("video file");
    let audio = std::fs::read(dir.path().join(&record.audio_file)).expect("audio file");
    assert_eq!(video, b"video-frame");
    assert_eq!(audio, b"audio-frame");
}

#[tokio::test]
async fn abort_midway_releases_devices_and_keeps_saved_responses() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteResponseStore::open(dir.path()).await.expect("store");
    let probe = Arc::new(Probe::default());

    let mut sequencer = InterviewSequencer::new(
        questions(3),
        DeviceSelection::new("cam0", "mic0"),
        Arc::new(FakeSource {
            probe: Arc::clone(&probe),
        }),
        Arc::new(NoopPreview::new()),
        store,
    )
    .expect("sequencer");

    // Answer the first question
    sequencer.open_session().await.expect("open session");
    let session = sequencer.session_mut().expect("session");
    session.start().await.expect("start");
    let result = session.stop().await.expect("stop");
    sequencer.advance(result).await.expect("advance");

    // Quit while the second question's session is open
    sequencer.abort().await;

    assert_eq!(
        probe.opened.load(Ordering::SeqCst),
        probe.released.load(Ordering::SeqCst)
    );

    let store = SqliteResponseStore::open(dir.path()).await.expect("store");
    let persisted = store.list_all().await.expect("list");
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].question, "Question 1?");
}
