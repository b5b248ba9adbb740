use std::sync::Arc;
use tokio::sync::mpsc;

use docforge_core::{AuthContext, GenerationOutcome, GenerationRequest, RepoTarget};

use crate::app_core::{AppCommand, DomainEvent};
use crate::ports::{AuthRepo, GenerationPort};
use crate::session::{SessionRunEvent, SessionRunId};

pub struct SessionKernel<A, G> {
    pub store: crate::app_core::AppStore,
    auth: Arc<A>,
    generation: G,

    tx: mpsc::Sender<DomainEvent>,
    rx: mpsc::Receiver<DomainEvent>,
}

impl<A, G> SessionKernel<A, G>
where
    A: AuthRepo,
    G: GenerationPort,
{
    pub fn new(store: crate::app_core::AppStore, auth: A, generation: G) -> Self {
        let (tx, rx) = mpsc::channel(docforge_config::EVENT_QUEUE_CAPACITY);
        Self {
            store,
            auth: Arc::new(auth),
            generation,
            tx,
            rx,
        }
    }

    pub fn dispatch(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::LoadInitialState => {
                self.store.apply(DomainEvent::BootLoadingStarted);
                let tx = self.tx.clone();
                let auth = self.auth.clone();
                let spawn_res = std::thread::Builder::new()
                    .name("docforge-load-auth".into())
                    .spawn(move || match auth.load() {
                        Ok(ctx) => {
                            let _ = tx.blocking_send(DomainEvent::InitialStateLoaded { auth: ctx });
                        }
                        Err(e) => {
                            let _ = tx.blocking_send(DomainEvent::BootFailed {
                                message: e.to_string(),
                            });
                        }
                    });

                if let Err(e) = spawn_res {
                    self.store.apply(DomainEvent::BootFailed {
                        message: format!("Failed to start boot worker thread: {e}"),
                    });
                }
            }

            AppCommand::Login { token, user_id } => {
                let ctx = AuthContext::new(token, user_id);
                if !ctx.is_complete() {
                    self.store.apply(DomainEvent::UserError(
                        "Token and user id must be non-empty".into(),
                    ));
                    return;
                }

                self.store.apply(DomainEvent::AuthUpdated(ctx.clone()));

                let auth_repo = self.auth.clone();
                let tx = self.tx.clone();
                let spawn_res = std::thread::Builder::new()
                    .name("docforge-save-auth".into())
                    .spawn(move || {
                        if let Err(e) = auth_repo.save(&ctx) {
                            let _ = tx.blocking_send(DomainEvent::UserError(e.to_string()));
                        }
                    });
                if let Err(e) = spawn_res {
                    self.store.apply(DomainEvent::UserError(format!(
                        "Failed to start auth save worker thread: {e}"
                    )));
                }
            }

            AppCommand::Logout => {
                self.store.apply(DomainEvent::AuthCleared);

                let auth_repo = self.auth.clone();
                let tx = self.tx.clone();
                let spawn_res = std::thread::Builder::new()
                    .name("docforge-clear-auth".into())
                    .spawn(move || {
                        if let Err(e) = auth_repo.clear() {
                            let _ = tx.blocking_send(DomainEvent::UserError(e.to_string()));
                        }
                    });
                if let Err(e) = spawn_res {
                    self.store.apply(DomainEvent::UserError(format!(
                        "Failed to start auth clear worker thread: {e}"
                    )));
                }
            }

            AppCommand::SubmitGeneration {
                owner,
                repo,
                include_tests,
            } => {
                let run_id: SessionRunId = uuid::Uuid::new_v4();
                self.store.with_state_mut(|state| {
                    state.session.run_id = Some(run_id);
                });

                let target = RepoTarget::new(owner, repo);
                self.store.apply(DomainEvent::SessionEvent {
                    run_id,
                    ev: SessionRunEvent::Started {
                        target: target.clone(),
                    },
                });

                // Missing credentials resolve the session immediately; no
                // worker is started and nothing touches the network.
                let Some(auth) = self.store.state().auth else {
                    self.store.apply(DomainEvent::SessionEvent {
                        run_id,
                        ev: SessionRunEvent::Resolved(GenerationOutcome::Failure(
                            "Unauthorized".into(),
                        )),
                    });
                    return;
                };

                let request = GenerationRequest::new(target, auth, include_tests);
                if let Err(e) = self
                    .generation
                    .start_generation(request, run_id, self.tx.clone())
                {
                    self.store.apply(DomainEvent::SessionEvent {
                        run_id,
                        ev: SessionRunEvent::Resolved(GenerationOutcome::Failure(format!(
                            "Failed to start generation worker: {e}"
                        ))),
                    });
                }
            }
        }
    }

    /// Drain pending worker events into the store. Session events from a
    /// superseded run are dropped here, so a stale channel can never
    /// mutate the active session.
    pub fn tick(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            if let DomainEvent::SessionEvent { run_id, .. } = &ev {
                let current = self.store.state().session.run_id;
                if current != Some(*run_id) {
                    continue;
                }
            }
            self.store.apply(ev);
        }
    }

    pub fn sender(&self) -> mpsc::Sender<DomainEvent> {
        self.tx.clone()
    }
}
