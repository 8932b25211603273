//! Signal handling for graceful shutdown.
//!
//! A dedicated thread turns SIGINT, SIGTERM, and SIGHUP into a shutdown
//! message on a channel plus a cleared `running` flag. The terminal
//! board's quit keys feed the same channel, so every way of stopping
//! turnr converges on the one cleanup path that forces the LED off.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

/// Message passed from signal or keyboard handlers to the main loop.
#[derive(Debug, Clone)]
pub enum SignalMessage {
    /// Stop the main loop and run the cleanup path.
    Shutdown,
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Atomic flag indicating if the application should keep running
    pub running: Arc<AtomicBool>,
    /// Channel receiver for signal messages
    pub signal_receiver: std::sync::mpsc::Receiver<SignalMessage>,
    /// Channel sender cloned into the terminal board's quit keys
    pub signal_sender: std::sync::mpsc::Sender<SignalMessage>,
}

/// Handle a signal message received in the main loop.
pub fn handle_signal_message(signal_msg: SignalMessage, signal_state: &SignalState) {
    match signal_msg {
        SignalMessage::Shutdown => {
            signal_state.running.store(false, Ordering::SeqCst);
        }
    }
}

/// Register the signal handler thread.
///
/// SIGHUP gets no log line since the terminal it would print to is
/// already gone, but it still takes the graceful path so the LED is
/// turned off before exit.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = std::sync::mpsc::channel::<SignalMessage>();

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;

    let running_clone = running.clone();
    let signal_sender_clone = signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGINT => {
                    log_pipe!();
                    if debug_enabled {
                        log_info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                    } else {
                        log_info!("Received interrupt signal, initiating graceful shutdown...");
                    }
                }
                SIGTERM => {
                    log_pipe!();
                    log_info!("Received termination request, initiating graceful shutdown...");
                }
                // SIGHUP: the controlling terminal disconnected
                _ => {}
            }

            if let Err(e) = signal_sender_clone.send(SignalMessage::Shutdown)
                && sig != SIGHUP
            {
                log_pipe!();
                log_warning!("Failed to send shutdown message: {e}");
                log_indented!("Main loop appears to have already exited");
            }

            running_clone.store(false, Ordering::SeqCst);
            break;
        }
    });

    Ok(SignalState {
        running,
        signal_receiver,
        signal_sender,
    })
}
