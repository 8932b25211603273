//! Urgency tiers and LED pattern selection.
//!
//! The remaining time of a turn is classified into a tier, each tier names
//! a preferred LED pattern, and a fixed fallback chain degrades that
//! pattern to whatever the connected indicator can actually render.
//! Degradation is decided by asking the indicator up front, never by
//! applying a pattern and reacting to the error.

use std::time::Duration;

use crate::board::Indicator;

/// How urgent the current turn is, ordered from calm to expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeedbackTier {
    /// Plenty of time left.
    Safe,
    /// Remaining time dropped to the yellow threshold.
    Warning,
    /// Remaining time dropped to the red threshold.
    Critical,
    /// The turn expired.
    TimeoutAlarm,
}

/// LED rendering requested from an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPattern {
    Off,
    Steady,
    SlowPulse,
    DimPulse,
    FastBlink,
    TripleBlink,
}

impl FeedbackTier {
    /// Classify remaining turn time against the configured thresholds.
    ///
    /// Thresholds are inclusive at their lower edge: remaining time equal
    /// to `yellow` is already a warning, equal to `red` already critical.
    /// Zero remaining means the deadline has passed.
    pub fn classify(remaining: Duration, yellow: Duration, red: Duration) -> Self {
        if remaining == Duration::ZERO {
            FeedbackTier::TimeoutAlarm
        } else if remaining > yellow {
            FeedbackTier::Safe
        } else if remaining > red {
            FeedbackTier::Warning
        } else {
            FeedbackTier::Critical
        }
    }

    /// The pattern this tier asks for on a fully capable indicator.
    pub fn preferred_pattern(self) -> LedPattern {
        match self {
            FeedbackTier::Safe => LedPattern::SlowPulse,
            FeedbackTier::Warning => LedPattern::DimPulse,
            FeedbackTier::Critical => LedPattern::FastBlink,
            FeedbackTier::TimeoutAlarm => LedPattern::TripleBlink,
        }
    }

    /// Patterns for this tier from most to least expressive.
    ///
    /// Every chain ends in `Steady` so a bare on/off LED still conveys
    /// that a turn is underway. `Off` is not part of any chain; it is the
    /// universal fallback in [`select_pattern`].
    pub fn fallback_chain(self) -> &'static [LedPattern] {
        match self {
            FeedbackTier::Safe => &[LedPattern::SlowPulse, LedPattern::Steady],
            FeedbackTier::Warning => &[
                LedPattern::DimPulse,
                LedPattern::SlowPulse,
                LedPattern::Steady,
            ],
            FeedbackTier::Critical => &[LedPattern::FastBlink, LedPattern::Steady],
            FeedbackTier::TimeoutAlarm => &[
                LedPattern::TripleBlink,
                LedPattern::FastBlink,
                LedPattern::Steady,
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeedbackTier::Safe => "safe",
            FeedbackTier::Warning => "warning",
            FeedbackTier::Critical => "critical",
            FeedbackTier::TimeoutAlarm => "timeout",
        }
    }
}

impl LedPattern {
    pub fn name(&self) -> &'static str {
        match self {
            LedPattern::Off => "off",
            LedPattern::Steady => "steady",
            LedPattern::SlowPulse => "slow-pulse",
            LedPattern::DimPulse => "dim-pulse",
            LedPattern::FastBlink => "fast-blink",
            LedPattern::TripleBlink => "triple-blink",
        }
    }
}

/// Pick the first pattern in the tier's fallback chain the indicator
/// supports, ending at `Off` when nothing in the chain is available.
pub fn select_pattern(tier: FeedbackTier, indicator: &dyn Indicator) -> LedPattern {
    for &pattern in tier.fallback_chain() {
        if indicator.supports(pattern) {
            return pattern;
        }
    }
    LedPattern::Off
}
