#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use slot_signals::{AutoDisconnect, AutoDisconnectable};

/// Install a fmt subscriber once so slot traces show up with
/// `cargo test -- --nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Receiver that remembers the last pair it saw and how often it was called.
#[derive(Default)]
pub struct Recorder {
    pub last: Cell<(i32, i32)>,
    pub second: Cell<(i32, i32)>,
    pub calls: Cell<usize>,
    pub auto: AutoDisconnect,
}

impl AutoDisconnectable for Recorder {
    fn auto_disconnect(&self) -> &AutoDisconnect {
        &self.auto
    }
}

impl Recorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set(&self, args: &(i32, i32)) {
        self.last.set(*args);
        self.calls.set(self.calls.get() + 1);
    }

    pub fn set_second(&self, args: &(i32, i32)) {
        self.second.set(*args);
        self.calls.set(self.calls.get() + 1);
    }
}
