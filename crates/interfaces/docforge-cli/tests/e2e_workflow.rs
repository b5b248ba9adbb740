use axum::body::Body;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use camino::Utf8PathBuf;
use docforge_cli::commands;
use docforge_core::{AuthContext, GenerationOutcome};
use std::net::SocketAddr;
use tempfile::tempdir;

async fn start_mock_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route(
            "/api/generate/progress",
            get(|| async {
                Body::from(
                    "{\"progress\":25,\"message\":\"reading sources\"}\n\
                     {\"progress\":80,\"message\":\"writing docs\",\"currentFile\":\"README\"}\n\
                     {\"progress\":100,\"message\":\"done\"}\n",
                )
            }),
        )
        .route(
            "/api/generate",
            post(|| async {
                (
                    StatusCode::OK,
                    Body::from(
                        r#"{"documentation":{"title":"E2E","description":"generated","techStack":["rust"]}}"#,
                    ),
                )
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, handle)
}

#[tokio::test]
async fn generate_writes_documentation_to_disk() {
    let (addr, server_handle) = start_mock_server().await;
    let service_url = format!("http://{addr}");

    let work_dir = tempdir().unwrap();
    let out = Utf8PathBuf::from_path_buf(work_dir.path().join("docs.json")).unwrap();

    let outcome = commands::cmd_generate(
        AuthContext::new("t1", "u1"),
        "acme".into(),
        "widget".into(),
        false,
        Some(out.clone()),
        &service_url,
    )
    .await
    .expect("generate command failed");

    assert!(outcome.is_success(), "expected success, got {outcome:?}");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["title"], "E2E");
    assert_eq!(written["techStack"][0], "rust");

    server_handle.abort();
}

#[tokio::test]
async fn generate_reports_payment_required() {
    let app = Router::new()
        .route(
            "/api/generate/progress",
            get(|| async { Body::from("{\"progress\":10}\n") }),
        )
        .route(
            "/api/generate",
            post(|| async { (StatusCode::PAYMENT_REQUIRED, Body::from("{}")) }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let outcome = commands::cmd_generate(
        AuthContext::new("t1", "u1"),
        "acme".into(),
        "widget".into(),
        false,
        None,
        &format!("http://{addr}"),
    )
    .await
    .expect("command should not error; the outcome carries the refusal");

    assert_eq!(outcome, GenerationOutcome::PaymentRequired);

    server_handle.abort();
}
