// ============================================================================
// slot-signals - Auto Disconnect
//
// Opt-in capability for receivers: embed an AutoDisconnect field and every
// slot connected through it is removed from its signal when the receiver is
// dropped.
// ============================================================================
//
// Two teardown directions have to hold:
//
// - Receiver dropped first: its ConnectionList fires every Connection, and
//   each signal removes the matching slot from its own list.
// - Signal dropped first: it removes its Connection from every receiver
//   that is still alive, so those receivers never reach back into it.
//
// Bound calls reach the list through a Weak handle, never a raw address.
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::primitives::connection::Connection;

// =============================================================================
// CONNECTION LIST
// =============================================================================

/// Connections registered against one receiver.
pub(crate) struct ConnectionList {
    entries: RefCell<Vec<Connection>>,
}

impl ConnectionList {
    fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, connection: Connection) {
        self.entries.borrow_mut().push(connection);
    }

    /// Remove the first entry equal to `connection`, if any.
    pub(crate) fn remove(&self, connection: &Connection) {
        let mut entries = self.entries.borrow_mut();
        if let Some(index) = entries.iter().position(|c| c == connection) {
            entries.remove(index);
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl Drop for ConnectionList {
    fn drop(&mut self) {
        let entries = std::mem::take(self.entries.get_mut());
        if entries.is_empty() {
            return;
        }

        tracing::debug!(connections = entries.len(), "receiver dropped, disconnecting slots");
        for connection in &entries {
            if let Err(err) = connection.disconnect() {
                tracing::warn!(
                    identity = %connection.identity(),
                    "auto-disconnect failed: {}",
                    err
                );
            }
        }
    }
}

// =============================================================================
// AUTO DISCONNECT
// =============================================================================

/// Embed this in a receiver to have its slots disconnected when it drops.
///
/// Expose it through [`AutoDisconnectable`] and connect with
/// [`Signal::connect_auto`](crate::Signal::connect_auto), or hand it over
/// explicitly with [`Signal::connect_with_owner`](crate::Signal::connect_with_owner)
/// when a receiver holds more than one.
///
/// Cloning gives a fresh, empty instance: a copy of a receiver is not
/// connected anywhere.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use slot_signals::{AutoDisconnect, AutoDisconnectable, Signal};
///
/// #[derive(Default)]
/// struct Receiver {
///     value: Cell<i32>,
///     auto: AutoDisconnect,
/// }
///
/// impl AutoDisconnectable for Receiver {
///     fn auto_disconnect(&self) -> &AutoDisconnect { &self.auto }
/// }
///
/// impl Receiver {
///     fn set(&self, v: &i32) { self.value.set(*v); }
/// }
///
/// let signal = Signal::<i32>::new();
/// let receiver = Rc::new(Receiver::default());
/// signal.connect_auto(&receiver, Receiver::set).unwrap();
/// assert_eq!(receiver.auto.connection_count(), 1);
///
/// drop(receiver);
/// assert_eq!(signal.slot_count(), 0);
/// ```
pub struct AutoDisconnect {
    connections: Rc<ConnectionList>,
}

impl AutoDisconnect {
    /// Create an instance with no connections.
    pub fn new() -> Self {
        Self {
            connections: Rc::new(ConnectionList::new()),
        }
    }

    /// Number of slots currently registered through this instance.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub(crate) fn connections(&self) -> &ConnectionList {
        &self.connections
    }

    /// Weak handle stored in bound calls.
    pub(crate) fn handle(&self) -> Weak<ConnectionList> {
        Rc::downgrade(&self.connections)
    }
}

impl Default for AutoDisconnect {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AutoDisconnect {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for AutoDisconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoDisconnect")
            .field("connections", &self.connection_count())
            .finish()
    }
}

// =============================================================================
// AUTO DISCONNECTABLE
// =============================================================================

/// Receivers that own an [`AutoDisconnect`].
pub trait AutoDisconnectable {
    /// The instance that `connect_auto` registers connections on.
    fn auto_disconnect(&self) -> &AutoDisconnect;
}

// =============================================================================
// TESTS
// =============================================================================
