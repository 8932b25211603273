use std::time::{Duration, Instant};

use turnr::audio::{CueProvider, Resolved};
use turnr::board::Indicator;
use turnr::common::constants::{DEFAULT_PLAYERS, DEFAULT_TURN_SECONDS};
use turnr::config::{AudioBackend, Board, Config};
use turnr::core::feedback::{FeedbackTier, LedPattern, select_pattern};
use turnr::core::machine::{Cue, TimerMachine};

// Helper function to create a session config for testing
fn create_session_config(
    turn_seconds: u64,
    warn_yellow: u64,
    warn_red: u64,
    players: u8,
) -> Config {
    Config {
        board: Some(Board::Headless),
        audio: Some(AudioBackend::Null),
        turn_seconds: Some(turn_seconds),
        warn_yellow: Some(warn_yellow),
        warn_red: Some(warn_red),
        players: Some(players),
        volume: Some(0.5),
        beep_ms: Some(120),
        beep_gap_ms: Some(40),
        sample_rate: Some(44_100),
        audio_dir: None,
        start_tones_p1: None,
        start_tones_p2: None,
        start_tones_p3: None,
        start_tones_p4: None,
        timeout_tones: None,
    }
}

fn machine_from(config: &Config) -> TimerMachine {
    TimerMachine::new(
        config.players.unwrap_or(DEFAULT_PLAYERS),
        Duration::from_secs(config.turn_seconds.unwrap_or(DEFAULT_TURN_SECONDS)),
    )
}

fn tier_at(machine: &TimerMachine, config: &Config, now: Instant) -> FeedbackTier {
    FeedbackTier::classify(
        machine.remaining(now),
        Duration::from_secs(config.warn_yellow.unwrap()),
        Duration::from_secs(config.warn_red.unwrap()),
    )
}

/// Indicator with the headless capability set, recording what it renders.
struct BasicLed {
    applied: Vec<LedPattern>,
}

impl BasicLed {
    fn new() -> Self {
        Self { applied: Vec::new() }
    }
}

impl Indicator for BasicLed {
    fn supports(&self, pattern: LedPattern) -> bool {
        matches!(
            pattern,
            LedPattern::Off | LedPattern::Steady | LedPattern::FastBlink
        )
    }

    fn apply(&mut self, pattern: LedPattern) -> anyhow::Result<()> {
        self.applied.push(pattern);
        Ok(())
    }
}

#[test]
fn test_full_round_walks_every_tier() {
    let config = create_session_config(10, 4, 2, 4);
    let mut machine = machine_from(&config);
    let start = Instant::now();

    assert_eq!(machine.press(start), Cue::StartTurn(1));
    assert_eq!(tier_at(&machine, &config, start), FeedbackTier::Safe);
    assert_eq!(
        tier_at(&machine, &config, start + Duration::from_secs(5)),
        FeedbackTier::Safe
    );
    assert_eq!(
        tier_at(&machine, &config, start + Duration::from_secs(6)),
        FeedbackTier::Warning
    );
    assert_eq!(
        tier_at(&machine, &config, start + Duration::from_secs(8)),
        FeedbackTier::Critical
    );

    assert_eq!(machine.tick(start + Duration::from_secs(9)), None);
    assert_eq!(
        machine.tick(start + Duration::from_secs(10)),
        Some(Cue::TimeoutAlarm)
    );
    assert_eq!(
        tier_at(&machine, &config, start + Duration::from_secs(10)),
        FeedbackTier::TimeoutAlarm
    );

    // The next press resumes the rotation with player 2 on a fresh turn
    let handover = start + Duration::from_secs(12);
    assert_eq!(machine.press(handover), Cue::StartTurn(2));
    assert_eq!(tier_at(&machine, &config, handover), FeedbackTier::Safe);
}

#[test]
fn test_empty_config_runs_a_session_on_defaults() {
    let config: Config = toml::from_str("").expect("empty config should parse");
    assert!(turnr::config::validation::validate_config(&config).is_ok());

    let mut machine = machine_from(&config);
    let now = Instant::now();
    assert_eq!(machine.press(now), Cue::StartTurn(1));
    assert_eq!(
        machine.remaining(now),
        Duration::from_secs(DEFAULT_TURN_SECONDS)
    );

    // Rotation wraps after the default player count
    let mut last = Cue::Welcome;
    for _ in 0..usize::from(DEFAULT_PLAYERS) {
        last = machine.press(now);
    }
    assert_eq!(last, Cue::StartTurn(1));
}

#[test]
fn test_validation_rejects_inverted_thresholds() {
    let config = create_session_config(10, 2, 4, 4);
    let result = turnr::config::validation::validate_config(&config);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("warn_red"));
}

#[test]
fn test_validation_rejects_warning_filling_whole_turn() {
    let config = create_session_config(10, 10, 2, 4);
    let result = turnr::config::validation::validate_config(&config);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("warn_yellow"));
}

#[test]
fn test_reduced_board_renders_every_tier_without_error() {
    let mut led = BasicLed::new();

    // SlowPulse and DimPulse degrade to Steady, the blink tiers to FastBlink
    for (tier, expected) in [
        (FeedbackTier::Safe, LedPattern::Steady),
        (FeedbackTier::Warning, LedPattern::Steady),
        (FeedbackTier::Critical, LedPattern::FastBlink),
        (FeedbackTier::TimeoutAlarm, LedPattern::FastBlink),
    ] {
        let pattern = select_pattern(tier, &led);
        assert_eq!(pattern, expected, "wrong pattern for {} tier", tier.name());
        led.apply(pattern).expect("reduced board must still apply");
    }

    assert_eq!(
        led.applied,
        vec![
            LedPattern::Steady,
            LedPattern::Steady,
            LedPattern::FastBlink,
            LedPattern::FastBlink
        ]
    );
}

#[test]
fn test_melody_override_flows_into_cue_resolution() {
    let audio_dir = tempfile::tempdir().expect("tempdir");
    let mut config = create_session_config(10, 4, 2, 2);
    config.audio_dir = Some(audio_dir.path().display().to_string());
    config.start_tones_p1 = Some(vec![440, 660]);

    let cues = CueProvider::from_config(&config, false).expect("provider");

    match cues.resolve(Cue::StartTurn(1)) {
        Some(Resolved::Tones(tones)) => {
            let freqs: Vec<f32> = tones.iter().map(|t| t.freq_hz).collect();
            assert_eq!(freqs, vec![440.0, 660.0]);
        }
        other => panic!("expected tone fallback, got {other:?}"),
    }

    // Player 2 keeps the built-in two-player preset
    match cues.resolve(Cue::StartTurn(2)) {
        Some(Resolved::Tones(tones)) => assert_eq!(tones.len(), 3),
        other => panic!("expected tone fallback, got {other:?}"),
    }
}

#[test]
fn test_asset_on_disk_wins_over_tones() {
    let audio_dir = tempfile::tempdir().expect("tempdir");
    let asset = audio_dir.path().join("timeout.wav");
    std::fs::write(&asset, b"RIFF").expect("write asset");

    let mut config = create_session_config(10, 4, 2, 4);
    config.audio_dir = Some(audio_dir.path().display().to_string());

    let cues = CueProvider::from_config(&config, false).expect("provider");
    assert_eq!(cues.resolve(Cue::TimeoutAlarm), Some(Resolved::Asset(asset)));

    // Start cues are untouched by the timeout asset
    assert!(matches!(
        cues.resolve(Cue::StartTurn(1)),
        Some(Resolved::Tones(_))
    ));
}
