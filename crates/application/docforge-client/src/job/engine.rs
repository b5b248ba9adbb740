use std::sync::{Arc, Mutex};

use docforge_core::{GenerationOutcome, GenerationRequest};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::job::backend::GenerationBackend;
use crate::job::channel::ProgressChannel;
use crate::job::resolver::resolve_terminal;
use crate::job::JobError;

/// One submitted job: its progress subscription plus the pending terminal
/// outcome.
pub struct JobHandle {
    pub channel: ProgressChannel,
    pub terminal: JoinHandle<GenerationOutcome>,
}

impl JobHandle {
    /// Await the terminal outcome. Closes the progress channel on every
    /// outcome kind.
    pub async fn outcome(self) -> GenerationOutcome {
        let out = match self.terminal.await {
            Ok(out) => out,
            Err(e) => GenerationOutcome::Failure(format!("terminal task failed: {e}")),
        };
        self.channel.close();
        out
    }
}

/// Builds and submits generation jobs, holding the single-flight invariant:
/// at most one live channel and one outstanding terminal request.
pub struct GenerationEngine {
    backend: Arc<dyn GenerationBackend>,
    active: Mutex<Option<CancellationToken>>,
}

impl GenerationEngine {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            active: Mutex::new(None),
        }
    }

    /// Validate and submit one request.
    ///
    /// Missing auth fields fail with `Unauthorized` before any network
    /// traffic. A previous job, if still live, has its channel torn down
    /// first; its terminal request is abandoned, never awaited.
    pub async fn submit(&self, request: GenerationRequest) -> Result<JobHandle, JobError> {
        if !request.auth.is_complete() {
            return Err(JobError::Unauthorized);
        }
        if !request.target.is_complete() {
            return Err(JobError::InvalidTarget);
        }

        let cancel = CancellationToken::new();
        {
            let mut active = self.active.lock().unwrap();
            if let Some(prev) = active.take() {
                debug!("superseding in-flight generation job");
                prev.cancel();
            }
            *active = Some(cancel.clone());
        }

        let channel = ProgressChannel::open(self.backend.as_ref(), &request, cancel)?;

        let backend = self.backend.clone();
        let terminal = tokio::spawn(async move {
            debug!(repo = %request.target.slug(), "terminal request issued");
            resolve_terminal(backend.submit_terminal(&request).await)
        });

        Ok(JobHandle { channel, terminal })
    }
}
