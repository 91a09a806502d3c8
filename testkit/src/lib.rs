// ============================================================================
// slot-signals-testkit
// Generic receivers that connect and disconnect from their own crate
// ============================================================================

//! Slots that are instantiated in this crate, so tests in another crate can
//! check that both sides agree on their identity.

use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

use slot_signals::{AutoDisconnect, AutoDisconnectable, Signal, SignalError};

/// Generic receiver; `hit` gets its own copy in every crate that uses it.
pub struct Tally<T> {
    pub hits: Cell<u32>,
    pub auto: AutoDisconnect,
    marker: PhantomData<T>,
}

impl<T> Tally<T> {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            hits: Cell::new(0),
            auto: AutoDisconnect::new(),
            marker: PhantomData,
        })
    }

    #[inline]
    pub fn hit(&self, _: &T) {
        self.hits.set(self.hits.get() + 1);
    }
}

impl<T> AutoDisconnectable for Tally<T> {
    fn auto_disconnect(&self) -> &AutoDisconnect {
        &self.auto
    }
}

/// Generic free slot.
#[inline]
pub fn count<T>(_: &T) {
    COUNT.with(|c| c.set(c.get() + 1));
}

thread_local! {
    static COUNT: Cell<u32> = const { Cell::new(0) };
}

/// Calls to [`count`] on this thread so far.
pub fn counted() -> u32 {
    COUNT.with(Cell::get)
}

pub fn connect_tally<T: 'static>(signal: &Signal<T>, tally: &Rc<Tally<T>>) -> Result<(), SignalError> {
    signal.connect_auto(tally, Tally::<T>::hit)
}

pub fn disconnect_tally<T: 'static>(
    signal: &Signal<T>,
    tally: &Rc<Tally<T>>,
) -> Result<(), SignalError> {
    signal.disconnect(tally, Tally::<T>::hit)
}

pub fn contains_tally<T: 'static>(signal: &Signal<T>, tally: &Rc<Tally<T>>) -> bool {
    signal.contains(tally, Tally::<T>::hit)
}

pub fn connect_count<T: 'static>(signal: &Signal<T>) -> Result<(), SignalError> {
    signal.connect_fn(count::<T>)
}

pub fn disconnect_count<T: 'static>(signal: &Signal<T>) -> Result<(), SignalError> {
    signal.disconnect_fn(count::<T>)
}
