use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use docforge_client::{ChannelSignal, GenerationEngine, JobError, JobHandle};
use docforge_core::{GenerationOutcome, GenerationRequest};

use crate::app_core::DomainEvent;
use crate::ports::GenerationPort;
use crate::session::{SessionRunEvent, SessionRunId};

/// Drives one generation job on a background worker, forwarding progress
/// and the terminal outcome into the kernel's event queue.
pub struct GenerationOrchestrator {
    engine: Arc<GenerationEngine>,
    cancel: Option<CancellationToken>,
}

impl GenerationOrchestrator {
    pub fn new(engine: Arc<GenerationEngine>) -> Self {
        Self {
            engine,
            cancel: None,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            tracing::debug!("tearing down superseded generation worker");
            token.cancel();
        }
    }
}

impl GenerationPort for GenerationOrchestrator {
    fn start_generation(
        &mut self,
        request: GenerationRequest,
        run_id: SessionRunId,
        tx: mpsc::Sender<DomainEvent>,
    ) -> anyhow::Result<()> {
        self.cancel();
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let engine = self.engine.clone();

        std::thread::Builder::new()
            .name("docforge-generate".into())
            .spawn(move || {
                let rt = match crate::async_runtime::runtime() {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = tx.blocking_send(DomainEvent::SessionEvent {
                            run_id,
                            ev: SessionRunEvent::Resolved(GenerationOutcome::Failure(format!(
                                "Failed to start async runtime: {e}"
                            ))),
                        });
                        return;
                    }
                };

                rt.block_on(async move {
                    let handle = match engine.submit(request).await {
                        Ok(h) => h,
                        Err(JobError::Unauthorized) => {
                            let _ = tx
                                .send(DomainEvent::SessionEvent {
                                    run_id,
                                    ev: SessionRunEvent::Resolved(GenerationOutcome::Failure(
                                        "Unauthorized".into(),
                                    )),
                                })
                                .await;
                            return;
                        }
                        Err(e) => {
                            let _ = tx
                                .send(DomainEvent::SessionEvent {
                                    run_id,
                                    ev: SessionRunEvent::Resolved(GenerationOutcome::Failure(
                                        e.to_string(),
                                    )),
                                })
                                .await;
                            return;
                        }
                    };

                    let _ = tx
                        .send(DomainEvent::SessionEvent {
                            run_id,
                            ev: SessionRunEvent::ChannelOpened,
                        })
                        .await;

                    let JobHandle {
                        mut channel,
                        mut terminal,
                    } = handle;
                    let mut channel_open = true;

                    loop {
                        tokio::select! {
                            _ = token.cancelled() => {
                                channel.close();
                                return;
                            }
                            sig = channel.recv(), if channel_open => match sig {
                                Some(ChannelSignal::Frame(frame)) => {
                                    let _ = tx.send(DomainEvent::SessionEvent {
                                        run_id,
                                        ev: SessionRunEvent::Progress(frame),
                                    }).await;
                                }
                                Some(ChannelSignal::Error(e)) => {
                                    channel_open = false;
                                    let _ = tx.send(DomainEvent::SessionEvent {
                                        run_id,
                                        ev: SessionRunEvent::ChannelClosed { error: Some(e) },
                                    }).await;
                                }
                                Some(ChannelSignal::Ended) | None => {
                                    channel_open = false;
                                    let _ = tx.send(DomainEvent::SessionEvent {
                                        run_id,
                                        ev: SessionRunEvent::ChannelClosed { error: None },
                                    }).await;
                                }
                            },
                            out = &mut terminal => {
                                channel.close();
                                let outcome = match out {
                                    Ok(o) => o,
                                    Err(e) => GenerationOutcome::Failure(format!(
                                        "terminal task failed: {e}"
                                    )),
                                };
                                let _ = tx.send(DomainEvent::SessionEvent {
                                    run_id,
                                    ev: SessionRunEvent::Resolved(outcome),
                                }).await;
                                return;
                            }
                        }
                    }
                });
            })
            .context("Failed to spawn generation worker thread")?;

        Ok(())
    }
}
