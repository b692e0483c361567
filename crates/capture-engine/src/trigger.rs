//! Activation triggers.
//!
//! Hotkey listeners run on their own threads; activations are queued on an
//! `mpsc` channel and drained by the UI loop, which owns all session state.

use std::sync::mpsc::{self, Receiver, Sender};

/// Source of "activate" events (global hotkey, tray item, CLI signal).
pub trait TriggerSource {
    /// Number of activations since the last poll. Each key press counts once.
    fn poll_activate(&mut self) -> usize;
}

/// Sending half: cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    tx: Sender<()>,
}

impl TriggerHandle {
    /// Queue one activation. Returns false once the receiver is gone.
    pub fn activate(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Receiving half, polled on the UI thread.
#[derive(Debug)]
pub struct ChannelTrigger {
    rx: Receiver<()>,
}

impl TriggerSource for ChannelTrigger {
    fn poll_activate(&mut self) -> usize {
        self.rx.try_iter().count()
    }
}

pub fn channel_trigger() -> (TriggerHandle, ChannelTrigger) {
    let (tx, rx) = mpsc::channel();
    (TriggerHandle { tx }, ChannelTrigger { rx })
}
