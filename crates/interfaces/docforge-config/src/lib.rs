//! Central configuration constants for runtime limits and defaults.

/// Default base URL of the documentation-generation service.
pub const DEFAULT_SERVICE_URL: &str = "https://api.docforge.dev";

/// Capacity of the session event queue between workers and the kernel.
pub const EVENT_QUEUE_CAPACITY: usize = 100;

/// Capacity of the progress-channel queue between transport and consumer.
pub const CHANNEL_QUEUE_CAPACITY: usize = 64;

/// How often interactive front ends should redraw progress, in milliseconds.
pub const UI_TICK_MILLIS: u64 = 100;

/// Fixed key for the persisted auth token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Fixed key for the persisted user id.
pub const USER_ID_KEY: &str = "user_id";

/// Clamp a raw percentage into the displayable range. Session state keeps
/// raw values (including the -1 idle sentinel); only display code clamps.
pub fn clamp_percent(v: i32) -> i32 {
    v.clamp(0, 100)
}
