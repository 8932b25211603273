//! Inert board for running without input hardware.
//!
//! The button never fires, so the timer stays idle forever; this mode
//! exists for service deployments and for exercising startup, shutdown,
//! and audio paths on machines without a device attached. The indicator
//! deliberately supports only a reduced pattern set, mirroring the
//! plainest hardware the fallback chains have to handle.

use anyhow::Result;
use std::time::Duration;

use super::{Button, Indicator};
use crate::core::feedback::LedPattern;

pub struct HeadlessButton;

impl HeadlessButton {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeadlessButton {
    fn default() -> Self {
        Self::new()
    }
}

impl Button for HeadlessButton {
    fn wait_for_press(&mut self, timeout: Duration) -> Result<bool> {
        std::thread::sleep(timeout);
        Ok(false)
    }
}

/// Logs pattern changes instead of driving an LED.
///
/// Supports only `Off`, `Steady`, and `FastBlink`, like a bare on/off
/// LED with a blink mode; richer patterns degrade before reaching it.
pub struct HeadlessIndicator {
    debug_enabled: bool,
}

impl HeadlessIndicator {
    pub fn new(debug_enabled: bool) -> Self {
        Self { debug_enabled }
    }
}

impl Indicator for HeadlessIndicator {
    fn supports(&self, pattern: LedPattern) -> bool {
        matches!(
            pattern,
            LedPattern::Off | LedPattern::Steady | LedPattern::FastBlink
        )
    }

    fn apply(&mut self, pattern: LedPattern) -> Result<()> {
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Headless LED: {}", pattern.name());
        } else {
            log_decorated!("LED {}", pattern.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_button_never_presses() {
        let mut button = HeadlessButton::new();
        let pressed = button.wait_for_press(Duration::from_millis(1)).unwrap();
        assert!(!pressed);
    }

    #[test]
    fn test_headless_indicator_reduced_capability_set() {
        let indicator = HeadlessIndicator::new(false);
        assert!(indicator.supports(LedPattern::Off));
        assert!(indicator.supports(LedPattern::Steady));
        assert!(indicator.supports(LedPattern::FastBlink));
        assert!(!indicator.supports(LedPattern::SlowPulse));
        assert!(!indicator.supports(LedPattern::DimPulse));
        assert!(!indicator.supports(LedPattern::TripleBlink));
    }

    #[test]
    fn test_headless_indicator_accepts_supported_patterns() {
        let mut indicator = HeadlessIndicator::new(false);
        assert!(indicator.apply(LedPattern::Steady).is_ok());
        assert!(indicator.apply(LedPattern::Off).is_ok());
    }
}
