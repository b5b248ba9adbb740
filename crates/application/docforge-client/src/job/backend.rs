use docforge_core::{GenerationRequest, RepoTarget};
use docforge_transport::StreamItem;
use reqwest::Client;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

use crate::job::{JobError, TerminalResponse};

/// Where the generation service lives and how the two job requests reach
/// it. Implementations must not interpret responses; classification is the
/// resolver's job.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Issue the single terminal request for `req` and return its raw
    /// response once the backend finishes (or refuses) the job.
    async fn submit_terminal(&self, req: &GenerationRequest) -> Result<TerminalResponse, JobError>;

    /// Open the progress stream for `req`, pumping raw items into `tx`
    /// until end-of-stream, transport error, or cancellation.
    fn open_progress_stream(
        &self,
        req: &GenerationRequest,
        tx: Sender<StreamItem>,
        cancel: CancellationToken,
    ) -> Result<(), JobError>;
}

/// Base URL of the generation service, normalized so endpoint joins are
/// well-defined.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    base: reqwest::Url,
}

impl ServiceEndpoint {
    /// Accepts a base URL with or without a trailing slash.
    ///
    /// Without the slash fixup, `Url::join("api/generate")` would replace
    /// the last path segment instead of appending under it.
    pub fn parse(raw: &str) -> Result<Self, JobError> {
        let mut base = reqwest::Url::parse(raw)
            .map_err(|e| JobError::Endpoint(format!("invalid service url {raw}: {e}")))?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self { base })
    }

    fn terminal_url(&self) -> Result<reqwest::Url, JobError> {
        self.base
            .join("api/generate")
            .map_err(|e| JobError::Endpoint(e.to_string()))
    }

    fn progress_url(&self, target: &RepoTarget, token: &str) -> Result<reqwest::Url, JobError> {
        let mut url = self
            .base
            .join("api/generate/progress")
            .map_err(|e| JobError::Endpoint(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("owner", &target.owner)
            .append_pair("repo", &target.repo)
            .append_pair("token", token);
        Ok(url)
    }
}

/// HTTP implementation: POST for the terminal request, a long-lived GET
/// for the newline-delimited progress stream.
pub struct HttpGenerationBackend {
    client: Client,
    endpoint: ServiceEndpoint,
}

impl HttpGenerationBackend {
    pub fn new(client: Client, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait::async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn submit_terminal(&self, req: &GenerationRequest) -> Result<TerminalResponse, JobError> {
        let url = self.endpoint.terminal_url()?;
        let resp = self
            .client
            .post(url)
            .bearer_auth(&req.auth.token)
            .json(&req.terminal_body())
            .send()
            .await
            .map_err(|e| JobError::Terminal(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| JobError::Terminal(e.to_string()))?
            .to_vec();

        Ok(TerminalResponse { status, body })
    }

    fn open_progress_stream(
        &self,
        req: &GenerationRequest,
        tx: Sender<StreamItem>,
        cancel: CancellationToken,
    ) -> Result<(), JobError> {
        let url = self.endpoint.progress_url(&req.target, &req.auth.token)?;
        docforge_transport::spawn_line_stream(self.client.clone(), url, tx, cancel);
        Ok(())
    }
}
