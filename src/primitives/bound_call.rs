// ============================================================================
// slot-signals - Bound Call
//
// A BoundCall is one slot: a free function, or a method paired with the
// receiver it runs on. It can be invoked with the signal's argument and
// compared through its CallIdentity without being invoked.
// ============================================================================

use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::identity::CallIdentity;
use crate::primitives::auto_disconnect::{AutoDisconnect, ConnectionList};

// =============================================================================
// CALL TARGET
// =============================================================================

/// Type-erased method call, so a bound call does not carry the receiver type.
trait ErasedMethod<A: ?Sized> {
    /// Run the method. Returns false when the receiver is gone.
    fn call(&self, args: &A) -> bool;

    /// Whether the receiver is still alive
    fn is_alive(&self) -> bool;
}

struct MethodCall<R: ?Sized, F> {
    receiver: Weak<R>,
    method: F,
}

impl<R, A, F> ErasedMethod<A> for MethodCall<R, F>
where
    R: ?Sized,
    A: ?Sized,
    F: Fn(&R, &A),
{
    fn call(&self, args: &A) -> bool {
        match self.receiver.upgrade() {
            Some(receiver) => {
                (self.method)(&*receiver, args);
                true
            }
            None => false,
        }
    }

    fn is_alive(&self) -> bool {
        self.receiver.strong_count() > 0
    }
}

/// What actually runs when the call is invoked.
enum Target<A: ?Sized> {
    Function(Rc<dyn Fn(&A)>),
    Method(Rc<dyn ErasedMethod<A>>),
}

impl<A: ?Sized> Clone for Target<A> {
    fn clone(&self) -> Self {
        match self {
            Target::Function(f) => Target::Function(f.clone()),
            Target::Method(m) => Target::Method(m.clone()),
        }
    }
}

// =============================================================================
// BOUND CALL
// =============================================================================

/// An invokable, comparable slot.
///
/// Callables are function items, methods or non-capturing closures. Each has
/// a type of its own, which gives the slot a stable identity.
///
/// The receiver of a method call is held through a `Weak`, so a bound call
/// never keeps its receiver alive. The weak reference also keeps the
/// receiver's allocation reserved, so the address inside the identity cannot
/// be reused by another receiver while this call exists.
///
/// Equality compares identities only.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use slot_signals::BoundCall;
///
/// struct Counter { hits: Cell<u32> }
///
/// impl Counter {
///     fn hit(&self, by: &u32) { self.hits.set(self.hits.get() + by); }
/// }
///
/// let counter = Rc::new(Counter { hits: Cell::new(0) });
/// let call = BoundCall::from_method(&counter, Counter::hit);
/// call.invoke(&3);
/// assert_eq!(counter.hits.get(), 3);
/// assert_eq!(call, BoundCall::from_method(&counter, Counter::hit));
/// ```
pub struct BoundCall<A: ?Sized + 'static> {
    identity: CallIdentity,
    target: Target<A>,

    /// Connection list of the receiver's AutoDisconnect, if this call was
    /// registered through the auto-disconnect path
    owner: Option<Weak<ConnectionList>>,
}

impl<A: ?Sized + 'static> BoundCall<A> {
    /// Bind a free function.
    ///
    /// `function` is normally a function item such as `on_event`; see
    /// [`CallIdentity`] for how `fn` pointer values are identified.
    pub fn from_fn<F>(function: F) -> Self
    where
        F: Fn(&A) + Copy + 'static,
    {
        Self {
            identity: CallIdentity::of_fn(&function),
            target: Target::Function(Rc::new(function)),
            owner: None,
        }
    }

    /// Bind a method to a receiver.
    pub fn from_method<R, F>(receiver: &Rc<R>, method: F) -> Self
    where
        R: ?Sized + 'static,
        F: Fn(&R, &A) + Copy + 'static,
    {
        let identity = CallIdentity::of_method(receiver, &method);
        let call = MethodCall {
            receiver: Rc::downgrade(receiver),
            method,
        };

        Self {
            identity,
            target: Target::Method(Rc::new(call)),
            owner: None,
        }
    }

    /// Attach the auto-disconnect owner this call is registered with.
    pub(crate) fn with_owner(mut self, owner: &AutoDisconnect) -> Self {
        self.owner = Some(owner.handle());
        self
    }

    /// Identity used for equality and lookup.
    pub fn identity(&self) -> CallIdentity {
        self.identity
    }

    /// Receiver word of the identity (0 for free functions).
    pub fn receiver_id(&self) -> usize {
        self.identity.receiver()
    }

    /// Whether an auto-disconnect owner is attached.
    pub fn has_owner(&self) -> bool {
        self.owner.is_some()
    }

    /// The owner's connection list, if it still exists.
    pub(crate) fn owner(&self) -> Option<Rc<ConnectionList>> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }

    /// Whether invoking would reach a live target.
    pub fn is_alive(&self) -> bool {
        match &self.target {
            Target::Function(_) => true,
            Target::Method(m) => m.is_alive(),
        }
    }

    /// Call the function or method.
    ///
    /// Returns false when the receiver has already been dropped, in which case
    /// nothing ran.
    pub fn invoke(&self, args: &A) -> bool {
        match &self.target {
            Target::Function(f) => {
                f(args);
                true
            }
            Target::Method(m) => m.call(args),
        }
    }
}

impl<A: ?Sized + 'static> Clone for BoundCall<A> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity,
            target: self.target.clone(),
            owner: self.owner.clone(),
        }
    }
}

impl<A: ?Sized + 'static> PartialEq for BoundCall<A> {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl<A: ?Sized + 'static> Eq for BoundCall<A> {}

impl<A: ?Sized + 'static> fmt::Debug for BoundCall<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundCall")
            .field("identity", &self.identity)
            .field("auto_disconnect", &self.has_owner())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
