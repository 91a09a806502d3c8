// ============================================================================
// slot-signals - Core Module
// Identity and error types shared by every primitive
// ============================================================================

pub mod error;
pub mod identity;

pub use error::{Operation, SignalError};
pub use identity::{receiver_address, CallIdentity};
