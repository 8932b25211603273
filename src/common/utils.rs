//! Utility functions for terminal management, process probing, and cleanup.

use anyhow::Result;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;

use crate::board::Indicator;
use crate::core::feedback::LedPattern;

/// RAII guard for terminal features during interactive operation.
///
/// Enables raw mode so single keypresses reach the terminal board without
/// line buffering, and hides the cursor for clean structured output. Both
/// are restored when the guard drops. When stdout is not a terminal
/// (headless operation under a service manager, or tests) the guard is
/// inert and changes nothing.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        if !std::io::stdout().is_terminal() {
            return Ok(Self { active: false });
        }

        crossterm::execute!(std::io::stdout(), crossterm::cursor::Hide)?;
        crossterm::terminal::enable_raw_mode()?;

        // Raw mode stops the terminal from expanding "\n", so the logger
        // must emit explicit carriage returns while this guard is alive
        crate::common::logger::Log::set_raw_mode_output(true);

        Ok(Self { active: true })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            crate::common::logger::Log::set_raw_mode_output(false);
            let _ = crossterm::terminal::disable_raw_mode();
            let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);
        }
    }
}

/// Release application resources during shutdown.
///
/// Forces the LED off through the indicator, then drops the lock file
/// handle and removes the lock path so the next start is clean.
pub fn cleanup_application(
    mut indicator: Box<dyn Indicator>,
    lock_file: File,
    lock_path: &str,
    debug_enabled: bool,
) {
    if let Err(e) = indicator.apply(LedPattern::Off) {
        log_warning!("Failed to turn off LED during cleanup: {e}");
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Removing lock file: {lock_path}");
    }

    drop(lock_file);
    if let Err(e) = std::fs::remove_file(lock_path)
        && Path::new(lock_path).exists()
    {
        log_warning!("Failed to remove lock file: {e}");
    }
}

/// Check if a process with the given PID is currently running.
pub fn is_process_running(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // Signal 0 probes for existence without delivering anything
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Format a path for log display, abbreviating the home directory to `~`.
pub fn private_path(path: &Path) -> String {
    let display = path.display().to_string();
    if let Some(home) = dirs::home_dir() {
        let home_str = home.display().to_string();
        if let Some(rest) = display.strip_prefix(&home_str) {
            return format!("~{rest}");
        }
    }
    display
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_process_running_own_pid() {
        assert!(is_process_running(std::process::id()));
    }

    #[test]
    fn test_is_process_running_unlikely_pid() {
        // PID numbers near the default kernel maximum are almost never live
        assert!(!is_process_running(4_194_000));
    }

    #[test]
    fn test_private_path_outside_home() {
        let formatted = private_path(Path::new("/tmp/turnr.lock"));
        assert_eq!(formatted, "/tmp/turnr.lock");
    }
}
