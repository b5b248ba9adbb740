use docforge_core::AuthContext;

use crate::session::SessionState;

#[derive(Debug, Clone)]
pub enum BootState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub boot: BootState,

    /// Credentials loaded at startup or set by login. `None` means the
    /// user must log in before submitting.
    pub auth: Option<AuthContext>,

    pub session: SessionState,

    /// Non-session user-visible errors (e.g. auth persistence failures).
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            boot: BootState::Loading,
            auth: None,
            session: SessionState::idle(),
            last_error: None,
        }
    }
}
