use docforge_app_core::app_core::{AppCommand, AppStore, DomainEvent};
use docforge_app_core::domain::AppState;
use docforge_app_core::kernel::SessionKernel;
use docforge_app_core::ports::{AuthRepo, GenerationPort};
use docforge_app_core::session::{SessionPhase, SessionRunEvent, SessionRunId};
use docforge_core::{AuthContext, GenerationRequest, ProgressFrame};
use tokio::sync::mpsc;

struct DummyAuthRepo;
impl AuthRepo for DummyAuthRepo {
    fn load(&self) -> anyhow::Result<Option<AuthContext>> {
        Ok(Some(AuthContext::new("t1", "u1")))
    }
    fn save(&self, _auth: &AuthContext) -> anyhow::Result<()> {
        Ok(())
    }
    fn clear(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

struct DummyGeneration;
impl GenerationPort for DummyGeneration {
    fn start_generation(
        &mut self,
        _request: GenerationRequest,
        _run_id: SessionRunId,
        _tx: mpsc::Sender<DomainEvent>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn stale_session_events_are_ignored_in_tick() {
    let stale: SessionRunId = uuid::Uuid::new_v4();

    let mut state = AppState::default();
    state.auth = Some(AuthContext::new("t1", "u1"));
    state.boot = docforge_app_core::domain::BootState::Ready;

    let store = AppStore::new(state);
    let mut kernel = SessionKernel::new(store.clone(), DummyAuthRepo, DummyGeneration);

    kernel.dispatch(AppCommand::SubmitGeneration {
        owner: "acme".into(),
        repo: "widget".into(),
        include_tests: false,
    });

    let before = store.state();
    assert_eq!(before.session.phase, SessionPhase::Submitting);

    kernel
        .sender()
        .send(DomainEvent::SessionEvent {
            run_id: stale,
            ev: SessionRunEvent::Progress(ProgressFrame {
                progress: Some(99),
                message: Some("stale".into()),
                current_file: None,
            }),
        })
        .await
        .unwrap();

    kernel.tick();

    let after = store.state();
    assert_eq!(before.session.run_id, after.session.run_id);
    assert_eq!(after.session.phase, SessionPhase::Submitting);
    assert_eq!(after.session.progress.percent, 0);
    assert_eq!(after.session.progress.message, "");
}
