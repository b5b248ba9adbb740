pub mod outcome;
pub mod progress;
pub mod request;

pub use outcome::{Documentation, GenerationOutcome};
pub use progress::{ProgressEvent, ProgressFrame, PROGRESS_COMPLETE, PROGRESS_IDLE};
pub use request::{AuthContext, GenerationRequest, RepoTarget};
