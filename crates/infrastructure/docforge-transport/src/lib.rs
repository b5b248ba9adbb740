pub mod net;

// Re-exports for convenience
pub use net::{default_http_client, spawn_line_stream, LineDecoder, StreamItem, TransportError};
