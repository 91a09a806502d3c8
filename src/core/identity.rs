// ============================================================================
// slot-signals - Call Identity
// Two-word identity of a bound call, used for lookup without invoking it
// ============================================================================

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

// =============================================================================
// CALL IDENTITY
// =============================================================================

/// Identity of a bound call: the receiver address plus a callable word.
///
/// - `receiver` is the address of the receiver's `Rc` allocation, or 0 for a
///   free function.
/// - `callable` is derived from the callable's type. Every function item and
///   closure has a type of its own, and its `TypeId` is the same in every
///   crate of a build, so `Receiver::method` gives the same word wherever it
///   is named, generic and `#[inline]` methods included.
///
/// Two bound calls built from the same (receiver, method) pair always produce
/// equal identities, which is how duplicate connects are detected and how a
/// call is located again for removal.
///
/// # Function pointers
///
/// All `fn` pointers of one signature share a type, so a callable passed as
/// an `fn(&R, &A)` value falls back to its address. Addresses are not stable
/// across crates: a generic method converted to a pointer in two crates may
/// give two words. A function item and a pointer made from it are also
/// different identities. Connect and disconnect with the same form.
///
/// Closures that capture state share one identity per closure type.
///
/// An identity is valid when at least one of the two words is non-zero.
/// `CallIdentity::default()` is the invalid identity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallIdentity {
    receiver: usize,
    callable: usize,
}

impl CallIdentity {
    /// Build an identity from raw words.
    pub const fn new(receiver: usize, callable: usize) -> Self {
        Self { receiver, callable }
    }

    /// Identity of a free function.
    pub fn of_fn<A, F>(function: &F) -> Self
    where
        A: ?Sized + 'static,
        F: Fn(&A) + 'static,
    {
        let any: &dyn Any = function;
        let callable = match any.downcast_ref::<fn(&A)>() {
            Some(pointer) => *pointer as usize,
            None => type_word::<F>(),
        };
        Self::new(0, callable)
    }

    /// Identity of a method bound to a receiver.
    pub fn of_method<R, A, F>(receiver: &Rc<R>, method: &F) -> Self
    where
        R: ?Sized + 'static,
        A: ?Sized + 'static,
        F: Fn(&R, &A) + 'static,
    {
        let any: &dyn Any = method;
        let callable = match any.downcast_ref::<fn(&R, &A)>() {
            Some(pointer) => *pointer as usize,
            None => type_word::<F>(),
        };
        Self::new(receiver_address(receiver), callable)
    }

    /// Receiver word (0 for free functions).
    pub const fn receiver(&self) -> usize {
        self.receiver
    }

    /// Callable word.
    pub const fn callable(&self) -> usize {
        self.callable
    }

    /// True when at least one word is non-zero.
    pub const fn is_valid(&self) -> bool {
        self.receiver != 0 || self.callable != 0
    }

    /// True when this identity belongs to a method call (not a free function).
    pub const fn is_method(&self) -> bool {
        self.receiver != 0
    }
}

/// Callable word for a type. The low bit is forced so the word is never 0.
fn type_word<F: 'static>() -> usize {
    let mut hasher = DefaultHasher::new();
    TypeId::of::<F>().hash(&mut hasher);
    hasher.finish() as usize | 1
}

impl fmt::Display for CallIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}:{:#x}", self.receiver, self.callable)
    }
}

/// Address of the data behind an `Rc`, with any pointer metadata dropped.
///
/// Works for trait objects too: `Rc<dyn Trait>` and the concrete `Rc<T>` it
/// was made from report the same address.
pub fn receiver_address<R: ?Sized>(receiver: &Rc<R>) -> usize {
    Rc::as_ptr(receiver).cast::<()>() as usize
}

// =============================================================================
// TESTS
// =============================================================================
