use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use docforge_app_core::app_core::{AppCommand, AppStore};
use docforge_app_core::domain::{AppState, BootState};
use docforge_app_core::kernel::SessionKernel;
use docforge_app_core::orchestrator::GenerationOrchestrator;
use docforge_app_core::ports::AuthRepo;
use docforge_app_core::session::SessionPhase;
use docforge_client::{default_engine, ServiceEndpoint};
use docforge_core::{AuthContext, GenerationOutcome};

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

async fn start_server(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn kernel_against(
    addr: SocketAddr,
) -> (SessionKernel<DummyAuthRepo, GenerationOrchestrator>, AppStore) {
    let endpoint = ServiceEndpoint::parse(&format!("http://{addr}")).unwrap();
    let engine = std::sync::Arc::new(default_engine(reqwest::Client::new(), endpoint));
    let orchestrator = GenerationOrchestrator::new(engine);

    let mut state = AppState::default();
    state.boot = BootState::Ready;
    state.auth = Some(AuthContext::new("t1", "u1"));
    let store = AppStore::new(state);
    let kernel = SessionKernel::new(store.clone(), DummyAuthRepo, orchestrator);
    (kernel, store)
}

async fn tick_until_resolved(
    kernel: &mut SessionKernel<DummyAuthRepo, GenerationOrchestrator>,
    store: &AppStore,
) -> AppState {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        kernel.tick();
        let state = store.state();
        if state.session.phase == SessionPhase::Resolved {
            return state;
        }
        assert!(Instant::now() < deadline, "session never resolved");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn full_generation_session_resolves_with_documentation() {
    let app = Router::new()
        .route(
            "/api/generate/progress",
            get(|| async {
                Body::from(
                    "{\"progress\":10,\"message\":\"cloning\"}\n\
                     {\"progress\":55,\"message\":\"documenting\",\"currentFile\":\"src/index.ts\"}\n\
                     {\"progress\":100,\"message\":\"done\"}\n",
                )
            }),
        )
        .route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(150)).await;
                (
                    StatusCode::OK,
                    Body::from(r#"{"documentation":{"title":"Widget"}}"#),
                )
            }),
        );
    let (addr, server) = start_server(app).await;

    let (mut kernel, store) = kernel_against(addr);
    kernel.dispatch(AppCommand::SubmitGeneration {
        owner: "acme".into(),
        repo: "widget".into(),
        include_tests: false,
    });

    let state = tick_until_resolved(&mut kernel, &store).await;
    match state.session.outcome {
        Some(GenerationOutcome::Success(doc)) => {
            assert_eq!(doc.title.as_deref(), Some("Widget"));
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(state.session.progress.percent, 100);
    assert_eq!(state.session.progress.current_file, None);

    server.abort();
}

#[tokio::test(flavor = "multi_thread")]
async fn payment_required_session_resolves_independently_of_progress() {
    let app = Router::new()
        .route(
            "/api/generate/progress",
            get(|| async { Body::from("{\"progress\":10}\n") }),
        )
        .route(
            "/api/generate",
            post(|| async { (StatusCode::PAYMENT_REQUIRED, Body::from("{}")) }),
        );
    let (addr, server) = start_server(app).await;

    let (mut kernel, store) = kernel_against(addr);
    kernel.dispatch(AppCommand::SubmitGeneration {
        owner: "acme".into(),
        repo: "widget".into(),
        include_tests: false,
    });

    let state = tick_until_resolved(&mut kernel, &store).await;
    assert_eq!(state.session.outcome, Some(GenerationOutcome::PaymentRequired));

    server.abort();
}
