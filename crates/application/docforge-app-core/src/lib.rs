pub mod app_core;
mod async_runtime;
pub mod domain;
pub mod kernel;
pub mod orchestrator;
pub mod persistence;
pub mod ports;
pub mod session;
pub mod viewmodel;

pub use app_core::*;
pub use domain::{AppState, BootState};
pub use kernel::SessionKernel;
pub use orchestrator::GenerationOrchestrator;
pub use persistence::AuthFileStore;
pub use ports::*;
pub use session::{SessionPhase, SessionRunEvent, SessionRunId, SessionState};
pub use viewmodel::*;
