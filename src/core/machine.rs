//! Turn timer state machine.
//!
//! The machine owns the rotation and deadline logic and nothing else: it
//! takes explicit `Instant`s from the caller, returns the audio cue each
//! transition produced, and leaves all rendering and playback to the core
//! loop. Every transition is testable without sleeping.

use std::time::{Duration, Instant};

/// Audio cue requested by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Played once at startup, before the main loop begins.
    Welcome,
    /// Played when the given player's turn begins.
    StartTurn(u8),
    /// Played once when a running turn expires.
    TimeoutAlarm,
}

/// Current position of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Waiting for the first press of a session.
    Idle,
    /// A turn is underway and expires at `deadline`.
    Running { player: u8, deadline: Instant },
    /// The running turn expired; the rotation resumes after `last_player`.
    Timeout { last_player: u8 },
}

/// Deterministic turn rotation and deadline bookkeeping.
#[derive(Debug)]
pub struct TimerMachine {
    players: u8,
    turn_length: Duration,
    state: TimerState,
}

impl TimerMachine {
    pub fn new(players: u8, turn_length: Duration) -> Self {
        Self {
            players,
            turn_length,
            state: TimerState::Idle,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Advance the rotation on a button press.
    ///
    /// Every press starts a turn: the first press of a session starts
    /// player 1, and any later press hands over to the next player in the
    /// rotation, whether the previous turn was still running or had
    /// already timed out.
    pub fn press(&mut self, now: Instant) -> Cue {
        let player = match self.state {
            TimerState::Idle => 1,
            TimerState::Running { player, .. } => self.next_player(player),
            TimerState::Timeout { last_player } => self.next_player(last_player),
        };

        self.state = TimerState::Running {
            player,
            deadline: now + self.turn_length,
        };

        Cue::StartTurn(player)
    }

    /// Check the deadline, entering `Timeout` at most once per turn.
    ///
    /// Returns the alarm cue exactly on the transition; further ticks
    /// while timed out or idle return `None`.
    pub fn tick(&mut self, now: Instant) -> Option<Cue> {
        if let TimerState::Running { player, deadline } = self.state
            && now >= deadline
        {
            self.state = TimerState::Timeout {
                last_player: player,
            };
            return Some(Cue::TimeoutAlarm);
        }
        None
    }

    /// Time left in the current turn, clamped to zero.
    ///
    /// Idle and timed-out states report zero remaining.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.state {
            TimerState::Running { deadline, .. } => deadline.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }

    fn next_player(&self, current: u8) -> u8 {
        (current % self.players) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> TimerMachine {
        TimerMachine::new(4, Duration::from_secs(10))
    }

    #[test]
    fn test_first_press_starts_player_one() {
        let mut m = machine();
        let now = Instant::now();
        assert_eq!(m.press(now), Cue::StartTurn(1));
        assert_eq!(
            m.state(),
            TimerState::Running {
                player: 1,
                deadline: now + Duration::from_secs(10)
            }
        );
    }

    #[test]
    fn test_press_rotates_through_players_and_wraps() {
        let mut m = machine();
        let now = Instant::now();
        m.press(now);
        assert_eq!(m.press(now), Cue::StartTurn(2));
        assert_eq!(m.press(now), Cue::StartTurn(3));
        assert_eq!(m.press(now), Cue::StartTurn(4));
        assert_eq!(m.press(now), Cue::StartTurn(1));
    }

    #[test]
    fn test_two_player_rotation_alternates() {
        let mut m = TimerMachine::new(2, Duration::from_secs(5));
        let now = Instant::now();
        assert_eq!(m.press(now), Cue::StartTurn(1));
        assert_eq!(m.press(now), Cue::StartTurn(2));
        assert_eq!(m.press(now), Cue::StartTurn(1));
    }

    #[test]
    fn test_tick_before_deadline_stays_running() {
        let mut m = machine();
        let now = Instant::now();
        m.press(now);
        assert_eq!(m.tick(now + Duration::from_secs(9)), None);
        assert!(matches!(m.state(), TimerState::Running { player: 1, .. }));
    }

    #[test]
    fn test_tick_at_deadline_times_out_once() {
        let mut m = machine();
        let now = Instant::now();
        m.press(now);
        let deadline = now + Duration::from_secs(10);
        assert_eq!(m.tick(deadline), Some(Cue::TimeoutAlarm));
        assert_eq!(m.state(), TimerState::Timeout { last_player: 1 });
        // Later ticks must not re-raise the alarm
        assert_eq!(m.tick(deadline + Duration::from_secs(30)), None);
    }

    #[test]
    fn test_press_after_timeout_resumes_rotation() {
        let mut m = machine();
        let now = Instant::now();
        m.press(now);
        m.press(now);
        m.tick(now + Duration::from_secs(20));
        assert_eq!(m.state(), TimerState::Timeout { last_player: 2 });
        assert_eq!(m.press(now + Duration::from_secs(21)), Cue::StartTurn(3));
    }

    #[test]
    fn test_remaining_counts_down_and_clamps() {
        let mut m = machine();
        let now = Instant::now();
        assert_eq!(m.remaining(now), Duration::ZERO);
        m.press(now);
        assert_eq!(m.remaining(now), Duration::from_secs(10));
        assert_eq!(
            m.remaining(now + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
        assert_eq!(m.remaining(now + Duration::from_secs(15)), Duration::ZERO);
    }

    #[test]
    fn test_remaining_zero_after_timeout() {
        let mut m = machine();
        let now = Instant::now();
        m.press(now);
        m.tick(now + Duration::from_secs(10));
        assert_eq!(m.remaining(now + Duration::from_secs(10)), Duration::ZERO);
    }

    #[test]
    fn test_tick_in_idle_is_inert() {
        let mut m = machine();
        assert_eq!(m.tick(Instant::now()), None);
        assert_eq!(m.state(), TimerState::Idle);
    }

    #[test]
    fn test_press_just_past_deadline_hands_over_without_alarm() {
        let mut m = machine();
        let now = Instant::now();
        m.press(now);
        // The press raced ahead of the tick that would have noticed expiry
        assert_eq!(
            m.press(now + Duration::from_secs(11)),
            Cue::StartTurn(2)
        );
        assert!(matches!(m.state(), TimerState::Running { player: 2, .. }));
    }

    #[test]
    fn test_press_storm_lands_on_expected_player() {
        let mut m = machine();
        let now = Instant::now();
        let mut last = Cue::Welcome;
        for _ in 0..13 {
            last = m.press(now);
        }
        assert_eq!(last, Cue::StartTurn(1));
    }
}
