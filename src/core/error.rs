// ============================================================================
// slot-signals - Errors
// ============================================================================

use std::fmt;

use thiserror::Error;

/// The signal operation that was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Adding a slot
    Connect,
    /// Removing one or more slots
    Disconnect,
    /// Running the slots
    Emit,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Connect => write!(f, "connect"),
            Operation::Disconnect => write!(f, "disconnect"),
            Operation::Emit => write!(f, "emit"),
        }
    }
}

/// Error returned by signal operations.
///
/// Not-found disconnects and duplicate connects are not errors; they succeed
/// without changing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The signal's slot list may not change (and the signal may not be
    /// emitted again) while that same signal is invoking its slots.
    #[error("cannot {operation} while the signal is invoking its slots")]
    InvalidOperation { operation: Operation },
}

impl SignalError {
    pub(crate) const fn invoking(operation: Operation) -> Self {
        SignalError::InvalidOperation { operation }
    }

    /// The operation that was rejected.
    pub const fn operation(&self) -> Operation {
        match self {
            SignalError::InvalidOperation { operation } => *operation,
        }
    }
}
