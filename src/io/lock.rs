//! Lock file management for single-instance enforcement.
//!
//! This module handles process-level locking to ensure only one turnr session
//! drives the board at a time. It also cleans up stale lock files left behind
//! by crashed sessions.

use anyhow::Result;
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

use crate::common::constants::EXIT_FAILURE;
use crate::common::utils;

/// Acquire an exclusive lock on the lock file.
///
/// Attempts to create and lock a file in the runtime directory to ensure
/// single-instance operation. The lock file contains the PID of the owning
/// process so conflicts can be diagnosed.
///
/// # Returns
/// - `Ok((lock_file, lock_path))` if the lock was successfully acquired
/// - `Err(_)` if an error occurred that requires termination
///
/// Never returns if another live instance holds the lock (exits the process).
pub fn acquire_lock() -> Result<(File, String)> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    let lock_path = format!("{runtime_dir}/turnr.lock");

    // Open lock file without truncating to preserve existing content
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;

    // Try to acquire exclusive lock (non-blocking)
    match lock_file.try_lock_exclusive() {
        Ok(()) => {
            stamp_lock(&lock_file)?;
            Ok((lock_file, lock_path))
        }
        Err(_) => {
            // Lock file exists and is locked - another instance may be running.
            // handle_lock_conflict either returns Ok(()) or exits the process.
            handle_lock_conflict(&lock_path)?;

            // Conflict was resolved (stale lock), retry once
            let retry_lock_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&lock_path)?;

            match retry_lock_file.try_lock_exclusive() {
                Ok(()) => {
                    stamp_lock(&retry_lock_file)?;
                    Ok((retry_lock_file, lock_path))
                }
                Err(e) => {
                    // Still failed after cleanup attempt
                    log_error_exit!("Failed to acquire lock after cleanup attempt: {}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            }
        }
    }
}

/// Truncate the lock file and record our PID in it.
fn stamp_lock(mut lock_file: &File) -> Result<()> {
    lock_file.set_len(0)?;
    lock_file.seek(SeekFrom::Start(0))?;

    let pid = std::process::id();
    writeln!(lock_file, "{pid}")?;
    lock_file.flush()?;

    Ok(())
}

/// Handle lock file conflicts intelligently.
///
/// Validates and cleans up lock files in the following scenarios:
/// - Stale lock files (process no longer running)
/// - Corrupt lock files (unreadable PID)
/// - Providing a clear message when a live instance is already running
///
/// # Returns
/// - `Ok(())` if the conflict was resolved (stale or corrupt lock)
/// - Never returns if another instance is running (calls std::process::exit)
pub fn handle_lock_conflict(lock_path: &str) -> Result<()> {
    // Read the lock file to get the owning PID
    let lock_content = match std::fs::read_to_string(lock_path) {
        Ok(content) => content,
        Err(_) => {
            // Lock file doesn't exist or can't be read - assume it was cleaned up
            return Ok(());
        }
    };

    let pid = match lock_content.trim().lines().next().map(str::parse::<u32>) {
        Some(Ok(pid)) => pid,
        _ => {
            log_warning!("Lock file contains invalid PID, removing stale lock");
            let _ = std::fs::remove_file(lock_path);
            return Ok(());
        }
    };

    // Check if the process is actually running
    if !utils::is_process_running(pid) {
        log_warning!("Removing stale lock file (process {pid} no longer running)");
        let _ = std::fs::remove_file(lock_path);
        return Ok(());
    }

    // Process is running - respect single instance enforcement
    log_pipe!();
    log_error!("turnr is already running (PID: {pid})");
    log_block_start!("Did you mean to:");
    log_indented!("• Use the session already attached to the board");
    log_indented!("• Stop it first: kill {pid}");
    log_block_start!("Cannot start - another turnr instance is running");
    log_end!();
    std::process::exit(EXIT_FAILURE)
}
