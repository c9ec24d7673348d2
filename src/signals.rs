//! Shutdown signal handling.
//!
//! SIGINT and SIGTERM are forwarded from a dedicated thread into an mpsc
//! channel. The main loop sleeps with `recv_timeout` on that channel, so a
//! shutdown request interrupts even a multi-hour sleep immediately.

use anyhow::{Context, Result};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::mpsc::{Receiver, channel};

/// Messages delivered to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    Shutdown,
}

/// Receiving end of the signal channel, owned by the main loop.
pub struct SignalState {
    pub receiver: Receiver<SignalMessage>,
}

/// Install the signal handler thread and return the channel to wait on.
pub fn setup_signal_handler() -> Result<SignalState> {
    let (sender, receiver) = channel();

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;

    std::thread::spawn(move || {
        for _signal in signals.forever() {
            if sender.send(SignalMessage::Shutdown).is_err() {
                // Main loop is gone; nothing left to notify
                break;
            }
        }
    });

    Ok(SignalState { receiver })
}
