// ============================================================================
// slot-signals - Signal
// Ordered slot list with connect/disconnect/emit and auto-disconnect support
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::error::{Operation, SignalError};
use crate::core::identity::{receiver_address, CallIdentity};
use crate::primitives::auto_disconnect::{AutoDisconnect, AutoDisconnectable};
use crate::primitives::bound_call::BoundCall;
use crate::primitives::connection::{Connection, Disconnect};

// =============================================================================
// SIGNAL INNER
// =============================================================================

/// Shared state behind a `Signal`.
///
/// Connections registered on receivers point here through a `Weak`, so a
/// receiver that outlives its signal finds nothing to disconnect.
struct SignalInner<A: ?Sized + 'static> {
    /// Slots in connection order, which is also invocation order
    slots: RefCell<Vec<BoundCall<A>>>,

    /// Raised for the duration of `emit`
    invoking: Cell<bool>,

    /// Self-reference handed out as the disconnect target
    this: Weak<SignalInner<A>>,
}

impl<A: ?Sized + 'static> SignalInner<A> {
    fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            slots: RefCell::new(Vec::new()),
            invoking: Cell::new(false),
            this: this.clone(),
        })
    }

    fn ensure_idle(&self, operation: Operation) -> Result<(), SignalError> {
        if self.invoking.get() {
            tracing::warn!(%operation, "rejected while the signal is invoking");
            return Err(SignalError::invoking(operation));
        }
        Ok(())
    }

    /// The connection this signal registers on a receiver for `identity`.
    fn connection_for(&self, identity: CallIdentity) -> Connection {
        let target: Weak<dyn Disconnect> = self.this.clone();
        Connection::with_target(identity, target)
    }

    fn contains(&self, identity: CallIdentity) -> bool {
        self.slots.borrow().iter().any(|c| c.identity() == identity)
    }

    /// Append `call` unless an equal one is already connected.
    fn insert(&self, call: BoundCall<A>, owner: Option<&AutoDisconnect>) {
        let identity = call.identity();
        if self.contains(identity) {
            tracing::trace!(%identity, "slot already connected");
            return;
        }

        let call = match owner {
            Some(owner) => {
                self.connection_for(identity).add_to_owner(owner);
                call.with_owner(owner)
            }
            None => call,
        };

        self.slots.borrow_mut().push(call);
        tracing::trace!(%identity, auto_disconnect = owner.is_some(), "slot connected");
    }

    /// Drop this signal's connection from the receiver that holds it, if any.
    fn release_owner(&self, call: &BoundCall<A>) {
        if let Some(list) = call.owner() {
            list.remove(&self.connection_for(call.identity()));
        }
    }

    /// Remove every slot matching `matches`, releasing receiver connections.
    ///
    /// Returns how many slots were removed.
    fn remove_matching(&self, mut matches: impl FnMut(&BoundCall<A>) -> bool) -> usize {
        let removed: Vec<BoundCall<A>> = {
            let mut slots = self.slots.borrow_mut();
            let (removed, kept) = std::mem::take(&mut *slots)
                .into_iter()
                .partition(|call| matches(call));
            *slots = kept;
            removed
        };

        for call in &removed {
            self.release_owner(call);
            tracing::trace!(identity = %call.identity(), "slot disconnected");
        }
        removed.len()
    }
}

impl<A: ?Sized + 'static> Disconnect for SignalInner<A> {
    /// Called from a receiver's teardown. Leaves the receiver's own
    /// connection list alone: it is being cleared by the caller.
    fn disconnect_by_connection(&self, connection: &Connection) -> Result<(), SignalError> {
        self.ensure_idle(Operation::Disconnect)?;
        if !connection.is_valid() {
            return Ok(());
        }

        let removed = {
            let mut slots = self.slots.borrow_mut();
            slots
                .iter()
                .position(|c| c.identity() == connection.identity())
                .map(|index| slots.remove(index))
        };

        if removed.is_some() {
            tracing::trace!(identity = %connection.identity(), "slot auto-disconnected");
        }
        Ok(())
    }
}

// =============================================================================
// SIGNAL<A> - The public signal handle
// =============================================================================

/// A typed, synchronous notification point.
///
/// Slots are free functions taking `&A` or methods taking `(&R, &A)` bound to
/// an `Rc<R>` receiver. They run in connection order every time the signal is
/// emitted. Several arguments are passed as a tuple.
///
/// Connecting the same (receiver, method) pair or function twice keeps one
/// slot. Disconnecting something that is not connected does nothing.
///
/// While the signal is emitting, connecting, disconnecting and emitting it
/// again fail with [`SignalError::InvalidOperation`]. Other signals may be
/// used freely from inside a slot.
///
/// Receivers that embed an [`AutoDisconnect`] can be connected with
/// [`connect_auto`](Self::connect_auto); their slots are then removed when
/// the receiver drops, and dropping the signal first removes its connections
/// from the receiver.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use slot_signals::Signal;
///
/// struct Receiver { sum: Cell<i32> }
///
/// impl Receiver {
///     fn add(&self, &(a, b): &(i32, i32)) { self.sum.set(a + b); }
/// }
///
/// let signal = Signal::<(i32, i32)>::new();
/// let receiver = Rc::new(Receiver { sum: Cell::new(0) });
///
/// signal.connect(&receiver, Receiver::add).unwrap();
/// signal.emit(&(10, 20)).unwrap();
/// assert_eq!(receiver.sum.get(), 30);
/// ```
pub struct Signal<A: ?Sized + 'static> {
    inner: Rc<SignalInner<A>>,
}

impl<A: ?Sized + 'static> Signal<A> {
    /// Create a signal with no slots.
    pub fn new() -> Self {
        Self {
            inner: SignalInner::new(),
        }
    }

    // =========================================================================
    // CONNECT
    // =========================================================================

    /// Connect a free function.
    pub fn connect_fn<F>(&self, function: F) -> Result<(), SignalError>
    where
        F: Fn(&A) + Copy + 'static,
    {
        self.inner.ensure_idle(Operation::Connect)?;
        self.inner.insert(BoundCall::from_fn(function), None);
        Ok(())
    }

    /// Connect a method of `receiver`.
    ///
    /// The signal does not keep the receiver alive. If the receiver drops
    /// while still connected, its slot stays listed but is skipped.
    pub fn connect<R, F>(&self, receiver: &Rc<R>, method: F) -> Result<(), SignalError>
    where
        R: ?Sized + 'static,
        F: Fn(&R, &A) + Copy + 'static,
    {
        self.inner.ensure_idle(Operation::Connect)?;
        self.inner.insert(BoundCall::from_method(receiver, method), None);
        Ok(())
    }

    /// Connect a method of a receiver that owns an [`AutoDisconnect`].
    ///
    /// The slot is removed automatically when the receiver drops.
    pub fn connect_auto<R, F>(&self, receiver: &Rc<R>, method: F) -> Result<(), SignalError>
    where
        R: AutoDisconnectable + ?Sized + 'static,
        F: Fn(&R, &A) + Copy + 'static,
    {
        self.connect_with_owner(receiver, receiver.auto_disconnect(), method)
    }

    /// Connect a method, registering the auto-disconnect on `owner`.
    ///
    /// Use this when the receiver holds more than one [`AutoDisconnect`] and
    /// the slot should follow a particular one. `owner` must live inside
    /// `receiver` (or at least not outlive it).
    pub fn connect_with_owner<R, F>(
        &self,
        receiver: &Rc<R>,
        owner: &AutoDisconnect,
        method: F,
    ) -> Result<(), SignalError>
    where
        R: ?Sized + 'static,
        F: Fn(&R, &A) + Copy + 'static,
    {
        self.inner.ensure_idle(Operation::Connect)?;
        self.inner
            .insert(BoundCall::from_method(receiver, method), Some(owner));
        Ok(())
    }

    // =========================================================================
    // DISCONNECT
    // =========================================================================

    /// Disconnect a free function.
    pub fn disconnect_fn<F>(&self, function: F) -> Result<(), SignalError>
    where
        F: Fn(&A) + Copy + 'static,
    {
        self.inner.ensure_idle(Operation::Disconnect)?;
        let identity = CallIdentity::of_fn(&function);
        self.inner.remove_matching(|call| call.identity() == identity);
        Ok(())
    }

    /// Disconnect one method of `receiver`.
    pub fn disconnect<R, F>(&self, receiver: &Rc<R>, method: F) -> Result<(), SignalError>
    where
        R: ?Sized + 'static,
        F: Fn(&R, &A) + Copy + 'static,
    {
        self.inner.ensure_idle(Operation::Disconnect)?;
        let identity = CallIdentity::of_method(receiver, &method);
        self.inner.remove_matching(|call| call.identity() == identity);
        Ok(())
    }

    /// Disconnect every method of `receiver`.
    pub fn disconnect_receiver<R>(&self, receiver: &Rc<R>) -> Result<(), SignalError>
    where
        R: ?Sized,
    {
        self.inner.ensure_idle(Operation::Disconnect)?;
        let address = receiver_address(receiver);
        self.inner
            .remove_matching(|call| call.receiver_id() == address);
        Ok(())
    }

    /// Disconnect every slot.
    pub fn disconnect_all(&self) -> Result<(), SignalError> {
        self.inner.ensure_idle(Operation::Disconnect)?;
        self.inner.remove_matching(|_| true);
        Ok(())
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Number of connected slots.
    pub fn slot_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    /// Whether at least one slot is connected.
    pub fn has_connections(&self) -> bool {
        self.slot_count() > 0
    }

    /// Whether no slot is connected.
    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Whether the signal is currently running its slots.
    pub fn is_invoking(&self) -> bool {
        self.inner.invoking.get()
    }

    /// Whether `function` is connected.
    pub fn contains_fn<F>(&self, function: F) -> bool
    where
        F: Fn(&A) + Copy + 'static,
    {
        self.inner.contains(CallIdentity::of_fn(&function))
    }

    /// Whether `method` of `receiver` is connected.
    pub fn contains<R, F>(&self, receiver: &Rc<R>, method: F) -> bool
    where
        R: ?Sized + 'static,
        F: Fn(&R, &A) + Copy + 'static,
    {
        self.inner.contains(CallIdentity::of_method(receiver, &method))
    }

    // =========================================================================
    // EMIT
    // =========================================================================

    /// Run every slot, in connection order, with `args`.
    ///
    /// Fails without running anything if this signal is already emitting.
    /// The invoking state is cleared even if a slot panics.
    pub fn emit(&self, args: &A) -> Result<(), SignalError> {
        let inner = &*self.inner;
        inner.ensure_idle(Operation::Emit)?;

        inner.invoking.set(true);
        let _idle = scopeguard::guard(&inner.invoking, |invoking| invoking.set(false));

        let slots = inner.slots.borrow();
        tracing::trace!(slots = slots.len(), "emitting");
        for call in slots.iter() {
            call.invoke(args);
        }
        Ok(())
    }
}

impl<A: ?Sized + 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + 'static> Drop for Signal<A> {
    fn drop(&mut self) {
        let released = self.inner.remove_matching(|_| true);
        if released > 0 {
            tracing::debug!(slots = released, "signal dropped, released slots");
        }
    }
}

impl<A: ?Sized + 'static> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slot_count())
            .field("invoking", &self.is_invoking())
            .finish()
    }
}

// =============================================================================
// CONVENIENCE FUNCTION
// =============================================================================

/// Create a new signal.
///
/// # Example
///
/// ```
/// use slot_signals::signal;
///
/// fn log(message: &str) { println!("{message}"); }
///
/// let on_message = signal::<str>();
/// on_message.connect_fn(log).unwrap();
/// on_message.emit("hello").unwrap();
/// ```
pub fn signal<A: ?Sized + 'static>() -> Signal<A> {
    Signal::new()
}

// =============================================================================
// TESTS
// =============================================================================
