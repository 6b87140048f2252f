//! The session controller.

use std::future::Future;
use std::mem;
use std::path::Path;

use jiff::Timestamp;
use quizgen_core::quiz::QuizSettings;
use quizgen_rig::generation::GenerationResult;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::document::Document;
use crate::error::{Result, SessionError};
use crate::event::{EVENT_CHANNEL_CAPACITY, SessionAction, SessionEvent};
use crate::pipeline::Pipeline;
use crate::state::{AnsweredState, ProcessedDocument, SessionPhase, SessionState};

/// One user's working context.
///
/// Actions take `&mut self`, so at most one runs at a time.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    created_at: Timestamp,
    pipeline: Pipeline,
    settings: QuizSettings,
    focus: Option<String>,
    pending: Option<Document>,
    state: SessionState,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Creates an idle session.
    pub fn new(pipeline: Pipeline, settings: QuizSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = Self {
            id: Uuid::now_v7(),
            created_at: Timestamp::now(),
            pipeline,
            settings,
            focus: None,
            pending: None,
            state: SessionState::Idle,
            events,
        };

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %session.id,
            settings = %session.settings,
            "Session created"
        );

        session
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current phase tag.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Quiz settings used by the next generation.
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Mutable access to the quiz settings.
    pub fn settings_mut(&mut self) -> &mut QuizSettings {
        &mut self.settings
    }

    /// Retrieval focus topic, if set.
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Sets or clears the retrieval focus topic.
    pub fn set_focus(&mut self, focus: Option<String>) {
        self.focus = focus.filter(|f| !f.trim().is_empty());
    }

    /// The staged upload, if any.
    pub fn pending_upload(&self) -> Option<&Document> {
        self.pending.as_ref()
    }

    /// Subscribes to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Stages `document` for the next [`process`](Self::process) call and
    /// returns the upload it replaces.
    ///
    /// The current state is untouched until processing succeeds.
    pub fn upload(&mut self, document: Document) -> Option<Document> {
        tracing::info!(
            target: TRACING_TARGET,
            session_id = %self.id,
            document = document.name(),
            bytes = document.len(),
            "Document staged"
        );
        self.pending.replace(document)
    }

    /// Extracts, chunks and indexes the staged upload.
    ///
    /// On success the new document replaces any previous document and
    /// answer. On failure or cancellation the session goes back to the state
    /// it was in and the upload stays staged.
    pub async fn process(&mut self, cancel: &CancellationToken) -> Result<&ProcessedDocument> {
        self.run_processing(cancel, |pipeline, document| async move {
            pipeline.process(&document).await
        })
        .await
    }

    async fn run_processing<F, Fut>(
        &mut self,
        cancel: &CancellationToken,
        work: F,
    ) -> Result<&ProcessedDocument>
    where
        F: FnOnce(Pipeline, Document) -> Fut,
        Fut: Future<Output = Result<ProcessedDocument>>,
    {
        let document = self.pending.take().ok_or(SessionError::NoDocument)?;
        let previous = self.transition(SessionState::Processing {
            document: document.name().to_owned(),
        });

        let work = work(self.pipeline.clone(), document.clone());
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SessionError::Cancelled),
            result = work => result,
        };

        let processed = match outcome {
            Ok(processed) => processed,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    session_id = %self.id,
                    document = document.name(),
                    error = %err,
                    "Processing failed, previous state restored"
                );
                self.pending = Some(document);
                self.transition(previous);
                return Err(err);
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %self.id,
            document = %processed.name,
            pages = processed.text.page_count(),
            chunks = processed.chunk_count(),
            "Document processed"
        );
        self.transition(SessionState::Ready(processed));

        self.state.document().ok_or(SessionError::NoDocument)
    }

    /// Generates questions about the processed document.
    ///
    /// A failure leaves the current document and any previous answer in
    /// place.
    pub async fn generate(&mut self, cancel: &CancellationToken) -> Result<&GenerationResult> {
        let Some(document) = self.state.document() else {
            return Err(SessionError::NotReady {
                phase: self.phase(),
            });
        };

        self.announce(SessionEvent::ActionStarted {
            action: SessionAction::Generate,
        });
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SessionError::Cancelled),
            result = self.pipeline.generate(document, self.settings, self.focus.as_deref()) => result,
        };
        self.announce(SessionEvent::ActionFinished {
            action: SessionAction::Generate,
            ok: outcome.is_ok(),
        });

        let result = outcome.inspect_err(|err| {
            tracing::warn!(
                target: TRACING_TARGET,
                session_id = %self.id,
                error = %err,
                "Generation failed"
            );
        })?;

        let from = self.phase();
        self.state = match mem::take(&mut self.state) {
            SessionState::Ready(document) => {
                SessionState::Answered(AnsweredState { document, result })
            }
            SessionState::Answered(answered) => SessionState::Answered(AnsweredState {
                document: answered.document,
                result,
            }),
            other => other,
        };
        self.notify(from);

        self.state.result().ok_or(SessionError::NothingToExport)
    }

    /// Renders the last answer as a PDF at `path`.
    ///
    /// Only available once questions were generated; the state is not
    /// changed. Returns the number of bytes written.
    pub async fn export(&self, path: impl AsRef<Path>) -> Result<usize> {
        let result = self.state.result().ok_or(SessionError::NothingToExport)?;

        self.announce(SessionEvent::ActionStarted {
            action: SessionAction::Export,
        });
        let outcome = self.pipeline.export(result, path.as_ref()).await;
        self.announce(SessionEvent::ActionFinished {
            action: SessionAction::Export,
            ok: outcome.is_ok(),
        });

        outcome
    }

    /// Clears the document, the answer, the staged upload and the focus.
    ///
    /// Quiz settings are kept.
    pub fn reset(&mut self) {
        self.pending = None;
        self.focus = None;
        self.transition(SessionState::Idle);

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %self.id,
            "Session reset"
        );
    }

    /// Replaces the state, announces the change and returns the old state.
    fn transition(&mut self, next: SessionState) -> SessionState {
        let previous = mem::replace(&mut self.state, next);
        self.notify(previous.phase());
        previous
    }

    fn notify(&self, from: SessionPhase) {
        let to = self.phase();
        tracing::debug!(
            target: TRACING_TARGET,
            session_id = %self.id,
            %from,
            %to,
            "Session state changed"
        );
        self.announce(SessionEvent::StateChanged { from, to });
    }

    fn announce(&self, event: SessionEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
