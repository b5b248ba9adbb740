use docforge_core::AuthContext;

use crate::session::{SessionRunEvent, SessionRunId};

#[derive(Debug, Clone)]
pub enum DomainEvent {
    // Boot state
    BootLoadingStarted,
    InitialStateLoaded { auth: Option<AuthContext> },
    BootFailed { message: String },

    // Auth
    AuthUpdated(AuthContext),
    AuthCleared,

    // Generation session
    SessionEvent {
        run_id: SessionRunId,
        ev: SessionRunEvent,
    },

    // User-visible errors
    UserError(String),
}
