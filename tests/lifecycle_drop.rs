mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::Recorder;
use slot_signals::{AutoDisconnect, AutoDisconnectable, Signal};

type FlagSignal = Signal<bool>;

// =============================================================================
// Receivers
// =============================================================================

#[derive(Default)]
struct First {
    called: Cell<bool>,
    auto: AutoDisconnect,
}

impl AutoDisconnectable for First {
    fn auto_disconnect(&self) -> &AutoDisconnect {
        &self.auto
    }
}

impl First {
    fn slot_first(&self, state: &bool) {
        self.called.set(*state);
    }
}

#[derive(Default)]
struct Second {
    called: Cell<bool>,
    auto: AutoDisconnect,
}

impl AutoDisconnectable for Second {
    fn auto_disconnect(&self) -> &AutoDisconnect {
        &self.auto
    }
}

impl Second {
    fn slot_second(&self, state: &bool) {
        self.called.set(*state);
    }
}

/// Composes both receivers, so it carries two AutoDisconnect instances and
/// has to say which one a connection belongs to.
#[derive(Default)]
struct Both {
    first: First,
    second: Second,
    called: Cell<bool>,
}

impl Both {
    fn slot_both(&self, state: &bool) {
        self.called.set(*state);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn receiver_drop_disconnects_from_signal() {
    common::init_tracing();

    let signal = Signal::<(i32, i32)>::new();
    let receiver = Recorder::new();

    signal.connect_auto(&receiver, Recorder::set).unwrap();
    signal.emit(&(10, 20)).unwrap();
    assert_eq!(receiver.last.get(), (10, 20));
    assert_eq!(signal.slot_count(), 1);

    drop(receiver);
    assert_eq!(signal.slot_count(), 0);
    signal.emit(&(30, 40)).unwrap();
}

#[test]
fn receiver_drop_disconnects_from_every_signal() {
    let a = Signal::<(i32, i32)>::new();
    let b = Signal::<(i32, i32)>::new();
    let doomed = Recorder::new();
    let survivor = Recorder::new();

    a.connect_auto(&doomed, Recorder::set).unwrap();
    a.connect_auto(&doomed, Recorder::set_second).unwrap();
    a.connect_auto(&survivor, Recorder::set).unwrap();
    b.connect_auto(&doomed, Recorder::set).unwrap();
    b.connect_auto(&survivor, Recorder::set).unwrap();

    drop(doomed);
    assert_eq!(a.slot_count(), 1);
    assert_eq!(b.slot_count(), 1);

    a.emit(&(1, 1)).unwrap();
    b.emit(&(2, 2)).unwrap();
    assert_eq!(survivor.calls.get(), 2);
    assert_eq!(survivor.last.get(), (2, 2));
}

#[test]
fn explicit_owner_selection() {
    let signal = FlagSignal::new();

    let r1 = Rc::new(First::default());
    let r2 = Rc::new(Second::default());
    let r3 = Rc::new(Both::default());

    signal.connect_auto(&r1, First::slot_first).unwrap();
    signal.connect_auto(&r2, Second::slot_second).unwrap();
    signal
        .connect_with_owner(&r3, &r3.second.auto, Both::slot_both)
        .unwrap();
    // Same slot through the other owner: duplicate, not connected
    signal
        .connect_with_owner(&r3, &r3.first.auto, Both::slot_both)
        .unwrap();

    assert_eq!(signal.slot_count(), 3);
    assert_eq!(r3.second.auto.connection_count(), 1);
    assert_eq!(r3.first.auto.connection_count(), 0);

    signal.emit(&true).unwrap();
    assert!(r1.called.get());
    assert!(r2.called.get());
    assert!(r3.called.get());

    drop(r3);
    assert_eq!(signal.slot_count(), 2);
    signal.emit(&false).unwrap();
    assert!(!r1.called.get());
    assert!(!r2.called.get());

    drop(r1);
    assert_eq!(signal.slot_count(), 1);
    signal.emit(&true).unwrap();
    assert!(r2.called.get());

    drop(r2);
    assert_eq!(signal.slot_count(), 0);
}

#[test]
fn receivers_with_two_owners_disconnect_independently() {
    let signal = FlagSignal::new();
    let left = Rc::new(Both::default());
    let right = Rc::new(Both::default());

    signal
        .connect_with_owner(&left, &left.first.auto, Both::slot_both)
        .unwrap();
    signal
        .connect_with_owner(&right, &right.second.auto, Both::slot_both)
        .unwrap();
    assert_eq!(signal.slot_count(), 2);

    drop(left);
    assert_eq!(signal.slot_count(), 1);
    assert_eq!(right.second.auto.connection_count(), 1);

    signal.emit(&true).unwrap();
    assert!(right.called.get());

    drop(right);
    assert_eq!(signal.slot_count(), 0);
}

#[test]
fn signal_drop_releases_receivers() {
    let sig1 = FlagSignal::new();
    let sig2 = FlagSignal::new();

    let r1 = Rc::new(First::default());
    let r2 = Rc::new(Second::default());
    let r3 = Rc::new(Both::default());

    sig1.connect_auto(&r1, First::slot_first).unwrap();
    sig1.connect_auto(&r2, Second::slot_second).unwrap();
    sig1.connect_with_owner(&r3, &r3.first.auto, Both::slot_both)
        .unwrap();
    assert_eq!(r1.auto.connection_count(), 1);
    assert_eq!(r2.auto.connection_count(), 1);
    assert_eq!(r3.first.auto.connection_count(), 1);
    sig1.emit(&true).unwrap();
    assert!(r1.called.get());
    assert!(r2.called.get());
    assert!(r3.called.get());

    sig2.connect_auto(&r1, First::slot_first).unwrap();
    sig2.connect_auto(&r2, Second::slot_second).unwrap();
    sig2.connect_with_owner(&r3, &r3.first.auto, Both::slot_both)
        .unwrap();
    assert_eq!(r1.auto.connection_count(), 2);
    assert_eq!(r2.auto.connection_count(), 2);
    assert_eq!(r3.first.auto.connection_count(), 2);
    sig2.emit(&false).unwrap();
    assert!(!r1.called.get());
    assert!(!r2.called.get());
    assert!(!r3.called.get());

    drop(sig1);
    assert_eq!(r1.auto.connection_count(), 1);
    assert_eq!(r2.auto.connection_count(), 1);
    assert_eq!(r3.first.auto.connection_count(), 1);
    sig2.emit(&true).unwrap();
    assert!(r1.called.get());
    assert!(r2.called.get());
    assert!(r3.called.get());

    drop(sig2);
    assert_eq!(r1.auto.connection_count(), 0);
    assert_eq!(r2.auto.connection_count(), 0);
    assert_eq!(r3.first.auto.connection_count(), 0);
}

#[test]
fn signal_then_receiver_drop_is_clean() {
    let receiver = Recorder::new();
    {
        let signal = Signal::<(i32, i32)>::new();
        signal.connect_auto(&receiver, Recorder::set).unwrap();
        signal.connect_auto(&receiver, Recorder::set_second).unwrap();
        assert_eq!(receiver.auto.connection_count(), 2);
    }
    assert_eq!(receiver.auto.connection_count(), 0);
    drop(receiver);
}

#[test]
fn receiver_dropped_while_signal_holds_plain_slot() {
    let signal = Signal::<(i32, i32)>::new();
    let receiver = Recorder::new();
    signal.connect(&receiver, Recorder::set).unwrap();

    drop(receiver);
    // Without auto-disconnect the slot stays, but is never called
    assert_eq!(signal.slot_count(), 1);
    signal.emit(&(1, 2)).unwrap();

    signal.disconnect_all().unwrap();
    assert!(signal.is_empty());
}

#[test]
fn cloned_receiver_is_not_connected() {
    #[derive(Clone, Default)]
    struct Copyable {
        hits: Cell<u32>,
        auto: AutoDisconnect,
    }

    impl AutoDisconnectable for Copyable {
        fn auto_disconnect(&self) -> &AutoDisconnect {
            &self.auto
        }
    }

    impl Copyable {
        fn hit(&self, _: &bool) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    let signal = FlagSignal::new();
    let original = Rc::new(Copyable::default());
    signal.connect_auto(&original, Copyable::hit).unwrap();

    let copy = Rc::new((*original).clone());
    assert_eq!(copy.auto.connection_count(), 0);

    drop(copy);
    assert_eq!(signal.slot_count(), 1);

    drop(original);
    assert_eq!(signal.slot_count(), 0);
}
