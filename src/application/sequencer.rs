//! Interview sequencing use case
//!
//! Owns the ordered question list and the sole capture session. On
//! advance it persists the finished response, then opens a session for
//! the next question or reports completion. Responses are persisted and
//! appended strictly in question order; one sequencer exists per
//! interview run, so only one session is ever active.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::device::DeviceSelection;
use crate::domain::interview::ResponseRecord;
use crate::domain::media::CaptureResult;

use super::capture::{CaptureError, CaptureSession};
use super::ports::{NewResponse, PreviewSink, ResponseStore, StoreError, TrackSource};

/// Errors from the interview sequencer
#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("Interview is already complete; no questions remain")]
    OutOfQuestions,

    #[error("Interview requires at least one question")]
    NoQuestions,

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// What `advance` decided
#[derive(Debug)]
pub enum AdvanceOutcome {
    /// More questions remain; a session for `index` is open
    Next { index: usize },
    /// Interview finished; all completed responses in question order
    Complete { responses: Vec<ResponseRecord> },
}

/// Result of one advance, with an optional persistence warning.
/// A store failure does not block the interview; the response stays in
/// memory and the summary may be incomplete on reload.
#[derive(Debug)]
pub struct Advanced {
    pub outcome: AdvanceOutcome,
    pub store_warning: Option<StoreError>,
}

/// Drives one interview run question by question
pub struct InterviewSequencer<S, P, R>
where
    S: TrackSource,
    P: PreviewSink,
    R: ResponseStore,
{
    questions: Vec<String>,
    current_index: usize,
    completed: Vec<ResponseRecord>,
    /// Captures that failed to persist, kept so nothing is lost
    unsaved: Vec<(usize, CaptureResult)>,
    selection: DeviceSelection,
    source: Arc<S>,
    preview: Arc<P>,
    store: R,
    session: Option<CaptureSession<S, P>>,
}

impl<S, P, R> InterviewSequencer<S, P, R>
where
    S: TrackSource,
    P: PreviewSink,
    R: ResponseStore,
{
    /// Create a sequencer over a non-empty question list
    pub fn new(
        questions: Vec<String>,
        selection: DeviceSelection,
        source: Arc<S>,
        preview: Arc<P>,
        store: R,
    ) -> Result<Self, SequencerError> {
        if questions.is_empty() {
            return Err(SequencerError::NoQuestions);
        }
        Ok(Self {
            questions,
            current_index: 0,
            completed: Vec::new(),
            unsaved: Vec::new(),
            selection,
            source,
            preview,
            store,
            session: None,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question currently being answered, `None` once complete
    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current_index).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn completed(&self) -> &[ResponseRecord] {
        &self.completed
    }

    /// Captures that could not be persisted, by question index
    pub fn unsaved(&self) -> &[(usize, CaptureResult)] {
        &self.unsaved
    }

    pub fn selection(&self) -> &DeviceSelection {
        &self.selection
    }

    /// Update the device selection used for subsequently opened sessions.
    /// Remediation path after a device failure.
    pub fn set_selection(&mut self, selection: DeviceSelection) {
        self.selection = selection;
    }

    /// The active capture session, if one is open
    pub fn session_mut(&mut self) -> Option<&mut CaptureSession<S, P>> {
        self.session.as_mut()
    }

    /// Open a capture session for the current question, disposing any
    /// previous one first. Also the retry path when a device failure
    /// interrupted `advance`.
    pub async fn open_session(&mut self) -> Result<&mut CaptureSession<S, P>, SequencerError> {
        if self.is_complete() {
            return Err(SequencerError::OutOfQuestions);
        }
        if let Some(mut old) = self.session.take() {
            old.dispose().await;
        }
        let session = CaptureSession::open(
            Arc::clone(&self.source),
            Arc::clone(&self.preview),
            self.selection.clone(),
        )
        .await?;
        self.session = Some(session);
        Ok(self.session.as_mut().ok_or(SequencerError::OutOfQuestions)?)
    }

    /// Record a finished capture for the current question and move on.
    ///
    /// Persists the response, appends it to the completed list, then
    /// opens a session for the next question or reports completion. If
    /// opening the next session fails, the position has still advanced;
    /// call `open_session` again after remediation.
    pub async fn advance(&mut self, capture: CaptureResult) -> Result<Advanced, SequencerError> {
        if self.is_complete() {
            return Err(SequencerError::OutOfQuestions);
        }
        let question = self.questions[self.current_index].clone();

        let mut store_warning = None;
        let record = match self
            .store
            .append(NewResponse::new(question.clone(), capture.clone()))
            .await
        {
            Ok(record) => record,
            Err(err) => {
                self.unsaved.push((self.current_index, capture));
                store_warning = Some(err);
                ResponseRecord::unsaved(question)
            }
        };
        self.completed.push(record);
        self.current_index += 1;

        if self.is_complete() {
            if let Some(mut old) = self.session.take() {
                old.dispose().await;
            }
            Ok(Advanced {
                outcome: AdvanceOutcome::Complete {
                    responses: self.completed.clone(),
                },
                store_warning,
            })
        } else {
            self.open_session().await?;
            Ok(Advanced {
                outcome: AdvanceOutcome::Next {
                    index: self.current_index,
                },
                store_warning,
            })
        }
    }

    /// Tear down the active session, keeping progress. Cancellation path.
    pub async fn abort(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.dispose().await;
        }
    }
}
