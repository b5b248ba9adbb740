pub mod job;

pub use job::backend::{GenerationBackend, HttpGenerationBackend, ServiceEndpoint};
pub use job::channel::{ChannelSignal, ProgressChannel};
pub use job::engine::{GenerationEngine, JobHandle};
pub use job::resolver::resolve_terminal;
pub use job::{JobError, TerminalResponse};

/// Convenience constructor for the default HTTP-backed engine.
pub fn default_engine(
    client: reqwest::Client,
    endpoint: ServiceEndpoint,
) -> GenerationEngine {
    GenerationEngine::new(std::sync::Arc::new(HttpGenerationBackend::new(
        client, endpoint,
    )))
}
