// ============================================================================
// slot-signals - Primitives Module
// Bound calls, connections, auto-disconnect and the signal itself
// ============================================================================

pub mod auto_disconnect;
pub mod bound_call;
pub mod connection;
pub mod signal;

// Re-export for convenience
pub use auto_disconnect::{AutoDisconnect, AutoDisconnectable};
pub use bound_call::BoundCall;
pub use connection::{Connection, Disconnect};
pub use signal::{signal, Signal};
