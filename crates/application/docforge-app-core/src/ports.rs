use docforge_core::{AuthContext, GenerationRequest};
use tokio::sync::mpsc;

use crate::app_core::DomainEvent;
use crate::session::SessionRunId;

pub trait AuthRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<Option<AuthContext>>;
    fn save(&self, auth: &AuthContext) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// Starts one generation job in the background. Implementations report
/// everything through `tx` as `DomainEvent::SessionEvent`s tagged with
/// `run_id`, and must tear down any job they previously started.
pub trait GenerationPort: Send + 'static {
    fn start_generation(
        &mut self,
        request: GenerationRequest,
        run_id: SessionRunId,
        tx: mpsc::Sender<DomainEvent>,
    ) -> anyhow::Result<()>;
}
