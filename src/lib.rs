// ============================================================================
// slot-signals - Typed Signals and Slots for Rust
// ============================================================================
//
// A signal owns an ordered list of slots (free functions or receiver
// methods) and calls them synchronously when emitted. Receivers that embed
// an AutoDisconnect are removed from every signal when they drop, and a
// signal that drops first removes itself from every receiver.
//
// Single-threaded by design: everything is Rc/RefCell.
// ============================================================================

//! Typed signal/slot connections with automatic disconnection.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use slot_signals::{AutoDisconnect, AutoDisconnectable, Signal};
//!
//! #[derive(Default)]
//! struct Receiver {
//!     last: Cell<(i32, i32)>,
//!     auto: AutoDisconnect,
//! }
//!
//! impl AutoDisconnectable for Receiver {
//!     fn auto_disconnect(&self) -> &AutoDisconnect { &self.auto }
//! }
//!
//! impl Receiver {
//!     fn set(&self, args: &(i32, i32)) { self.last.set(*args); }
//! }
//!
//! let signal = Signal::<(i32, i32)>::new();
//! let receiver = Rc::new(Receiver::default());
//!
//! signal.connect_auto(&receiver, Receiver::set).unwrap();
//! signal.emit(&(10, 20)).unwrap();
//! assert_eq!(receiver.last.get(), (10, 20));
//!
//! drop(receiver);
//! assert_eq!(signal.slot_count(), 0);
//! ```

pub mod core;
pub mod primitives;

// Re-export core items at crate root for ergonomic access
pub use crate::core::error::{Operation, SignalError};
pub use crate::core::identity::{receiver_address, CallIdentity};

// Re-export primitives at crate root
pub use crate::primitives::auto_disconnect::{AutoDisconnect, AutoDisconnectable};
pub use crate::primitives::bound_call::BoundCall;
pub use crate::primitives::connection::{Connection, Disconnect};
pub use crate::primitives::signal::{signal, Signal};

// =============================================================================
// TESTS
// =============================================================================
