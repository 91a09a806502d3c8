// ============================================================================
// slot-signals - Connection
//
// A Connection is the receiver-side record of one slot: the slot's identity
// plus a weak reference to whatever can remove it (normally the signal the
// slot lives in). Receivers hold these in their AutoDisconnect and fire them
// when they are dropped.
// ============================================================================

use std::fmt;
use std::rc::Weak;

use crate::core::error::SignalError;
use crate::core::identity::CallIdentity;
use crate::primitives::auto_disconnect::AutoDisconnect;

// =============================================================================
// DISCONNECT TARGET
// =============================================================================

/// Something that can remove a slot by its connection.
///
/// Implemented by every `Signal`'s internal state. The implementation must
/// only touch its own slot list, never the receiver's connection list: that
/// side is handled by whoever triggered the disconnect.
pub trait Disconnect {
    /// Remove the slot whose identity matches `connection`.
    ///
    /// Not finding it is not an error.
    fn disconnect_by_connection(&self, connection: &Connection) -> Result<(), SignalError>;
}

// =============================================================================
// CONNECTION
// =============================================================================

/// Identity of a slot plus an optional route back to its signal.
///
/// A connection is valid when its identity is valid. Disconnecting an invalid
/// connection, one without a target, or one whose target is gone does nothing.
/// Disconnecting twice is harmless: the second time the signal simply no
/// longer finds the identity.
#[derive(Clone, Default)]
pub struct Connection {
    identity: CallIdentity,
    target: Option<Weak<dyn Disconnect>>,
}

impl Connection {
    /// Identity-only connection, with no way to disconnect.
    pub fn new(identity: CallIdentity) -> Self {
        Self {
            identity,
            target: None,
        }
    }

    /// Connection that disconnects through `target`.
    pub fn with_target(identity: CallIdentity, target: Weak<dyn Disconnect>) -> Self {
        Self {
            identity,
            target: Some(target),
        }
    }

    /// Identity of the connected slot.
    pub fn identity(&self) -> CallIdentity {
        self.identity
    }

    /// Whether the identity is valid.
    pub fn is_valid(&self) -> bool {
        self.identity.is_valid()
    }

    /// Whether a disconnect target is attached (it may already be gone).
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Ask the target to remove the slot.
    pub fn disconnect(&self) -> Result<(), SignalError> {
        if !self.is_valid() {
            return Ok(());
        }
        match self.target.as_ref().and_then(Weak::upgrade) {
            Some(target) => target.disconnect_by_connection(self),
            None => Ok(()),
        }
    }

    /// Register a copy of this connection with a receiver.
    ///
    /// Invalid connections are never registered.
    pub fn add_to_owner(&self, owner: &AutoDisconnect) {
        if self.is_valid() {
            owner.connections().push(self.clone());
        }
    }

    /// Remove the first connection equal to this one from a receiver.
    pub fn remove_from_owner(&self, owner: &AutoDisconnect) {
        if self.is_valid() {
            owner.connections().remove(self);
        }
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && match (&self.target, &other.target) {
                (None, None) => true,
                (Some(a), Some(b)) => std::ptr::addr_eq(a.as_ptr(), b.as_ptr()),
                _ => false,
            }
    }
}

impl Eq for Connection {}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("identity", &self.identity)
            .field("target", &self.target.as_ref().map(|t| t.as_ptr().cast::<()>()))
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
