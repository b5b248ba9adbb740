use docforge_core::{GenerationRequest, ProgressFrame};
use docforge_transport::StreamItem;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::job::backend::GenerationBackend;
use crate::job::JobError;

/// One delivery from the progress channel.
#[derive(Debug)]
pub enum ChannelSignal {
    Frame(ProgressFrame),
    /// Transport failure. Ends the stream but does not fail the job; the
    /// terminal response stays authoritative.
    Error(String),
    /// The server closed the stream normally.
    Ended,
}

/// Subscription to one job's progress stream.
///
/// `close()` (or drop) cancels the underlying connection, so teardown is
/// guaranteed on every exit path: success, failure, or a superseding
/// submission.
pub struct ProgressChannel {
    rx: mpsc::Receiver<StreamItem>,
    cancel: CancellationToken,
}

impl ProgressChannel {
    pub(crate) fn open(
        backend: &dyn GenerationBackend,
        req: &GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<Self, JobError> {
        let (tx, rx) = mpsc::channel(docforge_config::CHANNEL_QUEUE_CAPACITY);
        backend.open_progress_stream(req, tx, cancel.clone())?;
        Ok(Self { rx, cancel })
    }

    /// Next signal, or `None` once the channel is closed and drained.
    /// Malformed lines are skipped (logged at warn), not surfaced: a
    /// message the client cannot read is a no-op update.
    pub async fn recv(&mut self) -> Option<ChannelSignal> {
        loop {
            match self.rx.recv().await? {
                StreamItem::Line(line) => match serde_json::from_str::<ProgressFrame>(&line) {
                    Ok(frame) => return Some(ChannelSignal::Frame(frame)),
                    Err(e) => {
                        warn!("skipping malformed progress line: {e}");
                        continue;
                    }
                },
                StreamItem::Error(e) => return Some(ChannelSignal::Error(e)),
                StreamItem::Ended => return Some(ChannelSignal::Ended),
            }
        }
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ProgressChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
