//! Media chunk and artifact value objects

use std::fmt;

/// Media kind of a recorded track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Get the MIME type string
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Video => "video/webm",
            Self::Audio => "audio/wav",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Video => "webm",
            Self::Audio => "wav",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}

/// One time-ordered fragment of a track's data, delivered incrementally
/// during recording. Ordering within a track is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaChunk(Vec<u8>);

impl MediaChunk {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn data(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The assembled, immutable binary result of one completed track recording.
/// Concatenation of the track's chunks in capture order. May be empty when
/// the device produced no data (degraded, not fatal).
#[derive(Debug, Clone)]
pub struct RecordingArtifact {
    data: Vec<u8>,
    kind: MediaKind,
}

impl RecordingArtifact {
    /// Assemble an artifact from a track's flushed chunk sequence
    pub fn assemble(kind: MediaKind, chunks: Vec<MediaChunk>) -> Self {
        let mut data = Vec::with_capacity(chunks.iter().map(MediaChunk::len).sum());
        for chunk in chunks {
            data.extend_from_slice(chunk.data());
        }
        Self { data, kind }
    }

    /// An empty artifact for a track that yielded no chunks
    pub fn empty(kind: MediaKind) -> Self {
        Self { data: Vec::new(), kind }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        human_readable_bytes(self.size_bytes() as u64)
    }
}

/// Format a byte count for display
pub fn human_readable_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Both tracks of a completed capture, handed off to whoever requested
/// the stop. The session does not retain it.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub video: RecordingArtifact,
    pub audio: RecordingArtifact,
}

impl CaptureResult {
    pub fn new(video: RecordingArtifact, audio: RecordingArtifact) -> Self {
        Self { video, audio }
    }

    /// True when either track came back empty. Degraded captures are
    /// allowed to proceed; the decision to retry belongs to the caller.
    pub fn is_degraded(&self) -> bool {
        self.video.is_empty() || self.audio.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_mime_and_extension() {
        assert_eq!(MediaKind::Video.mime_type(), "video/webm");
        assert_eq!(MediaKind::Audio.mime_type(), "audio/wav");
        assert_eq!(MediaKind::Video.extension(), "webm");
        assert_eq!(MediaKind::Audio.extension(), "wav");
    }

    #[test]
    fn assemble_concatenates_in_order() {
        let chunks = vec![
            MediaChunk::new(vec![1, 2]),
            MediaChunk::new(vec![3]),
            MediaChunk::new(vec![4, 5, 6]),
        ];
        let artifact = RecordingArtifact::assemble(MediaKind::Audio, chunks);
        assert_eq!(artifact.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(artifact.kind(), MediaKind::Audio);
    }

    #[test]
    fn assemble_with_no_chunks_is_empty() {
        let artifact = RecordingArtifact::assemble(MediaKind::Video, Vec::new());
        assert!(artifact.is_empty());
        assert_eq!(artifact.size_bytes(), 0);
    }

    #[test]
    fn human_readable_size() {
        let small = RecordingArtifact::assemble(MediaKind::Audio, vec![MediaChunk::new(vec![0; 500])]);
        assert_eq!(small.human_readable_size(), "500 B");

        let kb = RecordingArtifact::assemble(MediaKind::Audio, vec![MediaChunk::new(vec![0; 2048])]);
        assert_eq!(kb.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn byte_counts_format_across_unit_boundaries() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn degraded_when_one_track_empty() {
        let video = RecordingArtifact::assemble(MediaKind::Video, vec![MediaChunk::new(vec![1])]);
        let audio = RecordingArtifact::empty(MediaKind::Audio);
        let result = CaptureResult::new(video, audio);
        assert!(result.is_degraded());
    }

    #[test]
    fn not_degraded_when_both_present() {
        let video = RecordingArtifact::assemble(MediaKind::Video, vec![MediaChunk::new(vec![1])]);
        let audio = RecordingArtifact::assemble(MediaKind::Audio, vec![MediaChunk::new(vec![2])]);
        assert!(!CaptureResult::new(video, audio).is_degraded());
    }
}
