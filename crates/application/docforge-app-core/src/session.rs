use docforge_core::{GenerationOutcome, ProgressEvent, ProgressFrame, RepoTarget};
use uuid::Uuid;

/// Identifies one generation session. Each submit allocates a fresh id;
/// events tagged with a stale id are dropped before they can touch state.
pub type SessionRunId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Submitting,
    InProgress,
    Resolved,
}

/// Events a generation worker reports back to the kernel, always wrapped
/// with the run id they belong to.
#[derive(Debug, Clone)]
pub enum SessionRunEvent {
    Started { target: RepoTarget },
    ChannelOpened,
    Progress(ProgressFrame),
    /// The progress stream ended. Carries the transport error if there was
    /// one; either way the job itself is still awaiting its terminal
    /// response.
    ChannelClosed { error: Option<String> },
    Resolved(GenerationOutcome),
}

/// Client-side lifecycle of one documentation-generation job.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub run_id: Option<SessionRunId>,
    pub target: Option<RepoTarget>,
    pub phase: SessionPhase,
    pub progress: ProgressEvent,
    pub channel_error: Option<String>,
    pub outcome: Option<GenerationOutcome>,
}

impl SessionState {
    pub fn idle() -> Self {
        Self {
            run_id: None,
            target: None,
            phase: SessionPhase::Idle,
            progress: ProgressEvent::default(),
            channel_error: None,
            outcome: None,
        }
    }

    pub fn starting(target: RepoTarget) -> Self {
        Self {
            run_id: None,
            target: Some(target),
            phase: SessionPhase::Submitting,
            progress: ProgressEvent::default(),
            channel_error: None,
            outcome: None,
        }
    }

    pub fn with_run_id(mut self, run_id: Option<SessionRunId>) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Submitting | SessionPhase::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == SessionPhase::Resolved
    }
}
