//! Application coordinator that manages the complete lifecycle of turnr.
//!
//! This module handles resource acquisition, initialization, and orchestration
//! of the core timer loop. It manages:
//! - Configuration loading
//! - Board detection and creation
//! - Lock file management for single-instance enforcement
//! - Signal handler setup
//! - Audio sink and cue preparation
//! - Terminal setup with RAII guards
//!
//! The `Turnr` struct uses a builder pattern to support different startup
//! contexts:
//! - Normal startup: `Turnr::new(debug_enabled).run()`
//! - Side session without instance lock: `Turnr::new(true).without_lock().run()`

use anyhow::{Context, Result};

use crate::{
    audio::CueProvider,
    board::{create_audio, create_board, detect_board},
    common::constants::EXIT_FAILURE,
    common::utils::TerminalGuard,
    config::Config,
    core::{Core, CoreParams},
    io::lock::acquire_lock,
    io::signals::setup_signal_handler,
};

/// Builder for configuring and running the turnr session.
///
/// # Examples
///
/// ```no_run
/// use turnr::Turnr;
///
/// # fn main() -> anyhow::Result<()> {
/// // Normal application startup
/// let debug_enabled = false;
/// Turnr::new(debug_enabled).run()?;
///
/// // Second session for trying out a config while another runs
/// Turnr::new(true).without_lock().run()?;
/// # Ok(())
/// # }
/// ```
pub struct Turnr {
    debug_enabled: bool,
    create_lock: bool,
}

impl Turnr {
    /// Create a new runner with defaults matching normal startup.
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            create_lock: true,
        }
    }

    /// Skip lock file creation.
    ///
    /// Useful for a throwaway session on a machine where another instance
    /// already owns the board.
    pub fn without_lock(mut self) -> Self {
        self.create_lock = false;
        self
    }

    /// Run the application with the configured options.
    ///
    /// Acquires all resources in dependency order, hands them to
    /// [`Core`], and blocks until the session shuts down.
    pub fn run(self) -> Result<()> {
        log_version!();

        // Load configuration first; board detection needs it
        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log_error_exit!("Configuration failed");
                eprintln!("{:?}", e);
                std::process::exit(EXIT_FAILURE);
            }
        };

        // Resolve the board early so an impossible explicit selection
        // fails before any state is created
        let board_type = detect_board(&config)?;

        // Handle the lock before spawning the signal thread so a conflict
        // exits without leaving stray resources behind
        let lock_info = if self.create_lock {
            Some(acquire_lock()?)
        } else {
            None
        };

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        config.log_config(Some(board_type));

        log_block_start!("Detected board: {}", board_type.name());

        let (button, indicator) = create_board(
            board_type,
            self.debug_enabled,
            signal_state.signal_sender.clone(),
        )?;
        let speaker = create_audio(&config, self.debug_enabled)?;
        let cues = CueProvider::from_config(&config, self.debug_enabled)?;

        // Raw mode last: every startup step above may exit the process,
        // and process::exit skips the guard's Drop
        let _term = TerminalGuard::new().context("failed to initialize terminal features")?;

        if lock_info.is_some() {
            log_block_start!("Lock acquired, starting turnr...");
        } else {
            log_block_start!("Starting turnr without instance lock...");
        }

        let core = Core::new(CoreParams {
            config,
            button,
            indicator,
            speaker,
            cues,
            signal_state,
            lock_info,
            debug_enabled: self.debug_enabled,
        });

        core.execute()
    }
}
