use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::models::PlaybackStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub status: PlaybackStatus,
    pub interval_ms: u64,
}

impl ClockState {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            interval_ms: interval_ms.max(1),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == PlaybackStatus::Running
    }
}

/// Inputs to the clock. `index` and `len` are read from the session when the event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Play { index: usize, len: usize },
    Pause,
    Stop,
    Reset,
    Tick { index: usize, len: usize },
    RateChanged { interval_ms: u64 },
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEffect {
    ScheduleTick { after_ms: u64 },
    CancelTick,
    /// Move the committed index and persist it.
    Commit(usize),
}

pub fn transition(state: ClockState, event: ClockEvent) -> (ClockState, Vec<ClockEffect>) {
    use ClockEffect::*;

    let stopped = ClockState {
        status: PlaybackStatus::Stopped,
        ..state
    };

    match event {
        ClockEvent::Play { index, len } => {
            if state.is_running() || len == 0 || index >= len - 1 {
                return (state, Vec::new());
            }
            let running = ClockState {
                status: PlaybackStatus::Running,
                ..state
            };
            (
                running,
                vec![
                    CancelTick,
                    ScheduleTick {
                        after_ms: state.interval_ms,
                    },
                ],
            )
        }
        ClockEvent::Pause | ClockEvent::Stop | ClockEvent::Teardown => (stopped, vec![CancelTick]),
        ClockEvent::Reset => (stopped, vec![CancelTick, Commit(0)]),
        ClockEvent::Tick { index, len } => {
            if !state.is_running() {
                // Stale tick after a stop
                return (state, Vec::new());
            }
            if len == 0 || index >= len - 1 {
                return (stopped, vec![CancelTick]);
            }
            (
                state,
                vec![
                    Commit(index + 1),
                    ScheduleTick {
                        after_ms: state.interval_ms,
                    },
                ],
            )
        }
        ClockEvent::RateChanged { interval_ms } => {
            let next = ClockState {
                interval_ms: interval_ms.max(1),
                ..state
            };
            if state.is_running() {
                (
                    next,
                    vec![
                        CancelTick,
                        ScheduleTick {
                            after_ms: next.interval_ms,
                        },
                    ],
                )
            } else {
                (next, Vec::new())
            }
        }
    }
}

pub trait TimeSource {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Virtual clock advanced by hand. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<u64>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Holds at most one pending deadline.
#[derive(Debug)]
pub struct Ticker<T: TimeSource> {
    time: T,
    deadline: Option<u64>,
}

impl<T: TimeSource> Ticker<T> {
    pub fn new(time: T) -> Self {
        Self {
            time,
            deadline: None,
        }
    }

    /// Replaces any pending deadline.
    pub fn arm(&mut self, after_ms: u64) {
        self.deadline = Some(self.time.now_ms() + after_ms);
    }

    /// Schedules `after_ms` past `base`, so late polls do not push later ticks back.
    ///
    /// A deadline already in the past restarts from now instead of firing a burst.
    pub fn arm_after(&mut self, base: u64, after_ms: u64) {
        let now = self.time.now_ms();
        let deadline = base + after_ms;
        self.deadline = Some(if deadline > now { deadline } else { now + after_ms });
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn time_until_due(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(self.time.now_ms())))
    }

    /// Consumes the pending deadline if it has passed and returns it.
    pub fn take_due(&mut self) -> Option<u64> {
        match self.deadline {
            Some(deadline) if deadline <= self.time.now_ms() => {
                self.deadline = None;
                Some(deadline)
            }
            _ => None,
        }
    }

    pub fn time(&self) -> &T {
        &self.time
    }
}

/// Runs [`transition`] and applies its timer effects to a [`Ticker`].
///
/// Only [`ClockEffect::Commit`] is handed back to the caller. Dropping the clock
/// cancels the pending tick.
#[derive(Debug)]
pub struct PlaybackClock<T: TimeSource> {
    state: ClockState,
    ticker: Ticker<T>,
}

impl<T: TimeSource> PlaybackClock<T> {
    pub fn new(time: T, interval_ms: u64) -> Self {
        Self {
            state: ClockState::new(interval_ms),
            ticker: Ticker::new(time),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    pub fn has_pending_tick(&self) -> bool {
        self.ticker.is_armed()
    }

    pub fn time_until_tick(&self) -> Option<Duration> {
        self.ticker.time_until_due()
    }

    pub fn time(&self) -> &T {
        self.ticker.time()
    }

    pub fn dispatch(&mut self, event: ClockEvent) -> Vec<usize> {
        self.apply(event, None)
    }

    /// Fires the pending tick when due. Returns the indices to commit.
    ///
    /// The next tick is scheduled from the deadline that fired, not from now.
    pub fn poll(&mut self, index: usize, len: usize) -> Vec<usize> {
        match self.ticker.take_due() {
            Some(fired) => self.apply(ClockEvent::Tick { index, len }, Some(fired)),
            None => Vec::new(),
        }
    }

    fn apply(&mut self, event: ClockEvent, fired: Option<u64>) -> Vec<usize> {
        let (next, effects) = transition(self.state, event);
        self.state = next;

        let mut commits = Vec::new();
        for effect in effects {
            match effect {
                ClockEffect::ScheduleTick { after_ms } => match fired {
                    Some(base) => self.ticker.arm_after(base, after_ms),
                    None => self.ticker.arm(after_ms),
                },
                ClockEffect::CancelTick => self.ticker.disarm(),
                ClockEffect::Commit(index) => commits.push(index),
            }
        }
        commits
    }

    pub fn teardown(&mut self) {
        self.dispatch(ClockEvent::Teardown);
    }
}

impl<T: TimeSource> Drop for PlaybackClock<T> {
    fn drop(&mut self) {
        self.ticker.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn running(interval_ms: u64) -> ClockState {
        ClockState {
            status: PlaybackStatus::Running,
            interval_ms,
        }
    }

    #[test]
    fn test_play_schedules_one_tick() {
        let (state, effects) = transition(ClockState::new(200), ClockEvent::Play { index: 0, len: 5 });
        assert!(state.is_running());
        assert_eq!(
            effects,
            vec![ClockEffect::CancelTick, ClockEffect::ScheduleTick { after_ms: 200 }]
        );
    }

    #[test]
    fn test_play_is_refused_at_end_or_empty() {
        let (state, effects) = transition(ClockState::new(200), ClockEvent::Play { index: 4, len: 5 });
        assert!(!state.is_running());
        assert!(effects.is_empty());

        let (state, _) = transition(ClockState::new(200), ClockEvent::Play { index: 0, len: 0 });
        assert!(!state.is_running());
    }

    #[test]
    fn test_play_while_running_does_not_double_schedule() {
        let (_, effects) = transition(running(200), ClockEvent::Play { index: 0, len: 5 });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_tick_advances_or_stops_at_last_word() {
        let (state, effects) = transition(running(200), ClockEvent::Tick { index: 2, len: 5 });
        assert!(state.is_running());
        assert_eq!(effects[0], ClockEffect::Commit(3));

        let (state, effects) = transition(running(200), ClockEvent::Tick { index: 4, len: 5 });
        assert!(!state.is_running());
        assert!(!effects.iter().any(|e| matches!(e, ClockEffect::Commit(_))));
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let (state, effects) = transition(ClockState::new(200), ClockEvent::Tick { index: 0, len: 5 });
        assert!(!state.is_running());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_rate_change_reschedules_only_when_running() {
        let (state, effects) = transition(running(200), ClockEvent::RateChanged { interval_ms: 100 });
        assert_eq!(state.interval_ms, 100);
        assert_eq!(
            effects,
            vec![ClockEffect::CancelTick, ClockEffect::ScheduleTick { after_ms: 100 }]
        );

        let (state, effects) =
            transition(ClockState::new(200), ClockEvent::RateChanged { interval_ms: 100 });
        assert_eq!(state.interval_ms, 100);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_reset_stops_and_commits_zero() {
        let (state, effects) = transition(running(200), ClockEvent::Reset);
        assert!(!state.is_running());
        assert_eq!(effects, vec![ClockEffect::CancelTick, ClockEffect::Commit(0)]);
    }

    #[test]
    fn test_sixty_wpm_ticks_every_second() {
        let settings = Settings {
            words_per_minute: 60,
            ..Settings::default()
        };
        let time = ManualTime::new();
        let mut clock = PlaybackClock::new(time.clone(), settings.interval_ms());
        clock.dispatch(ClockEvent::Play { index: 0, len: 3 });

        time.advance(999);
        assert!(clock.poll(0, 3).is_empty());
        time.advance(1);
        assert_eq!(clock.poll(0, 3), vec![1]);
        assert_eq!(clock.time_until_tick(), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_no_tick_after_pause() {
        let time = ManualTime::new();
        let mut clock = PlaybackClock::new(time.clone(), 100);
        clock.dispatch(ClockEvent::Play { index: 0, len: 10 });
        clock.dispatch(ClockEvent::Pause);
        assert!(!clock.has_pending_tick());

        time.advance(10_000);
        assert!(clock.poll(0, 10).is_empty());
    }

    #[test]
    fn test_teardown_cancels_pending_tick() {
        let time = ManualTime::new();
        let mut clock = PlaybackClock::new(time.clone(), 100);
        clock.dispatch(ClockEvent::Play { index: 0, len: 10 });
        assert!(clock.has_pending_tick());
        clock.teardown();
        assert!(!clock.has_pending_tick());
        assert_eq!(clock.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn test_ticker_keeps_single_deadline() {
        let time = ManualTime::new();
        let mut ticker = Ticker::new(time.clone());
        ticker.arm(100);
        ticker.arm(300);
        time.advance(150);
        assert_eq!(ticker.take_due(), None);
        time.advance(150);
        assert_eq!(ticker.take_due(), Some(300));
        assert_eq!(ticker.take_due(), None);
    }

    #[test]
    fn test_late_poll_does_not_delay_following_ticks() {
        let time = ManualTime::new();
        let mut clock = PlaybackClock::new(time.clone(), 100);
        clock.dispatch(ClockEvent::Play { index: 0, len: 10 });

        // Polled 30 ms late; the next word is still due at 200
        time.advance(130);
        assert_eq!(clock.poll(0, 10), vec![1]);
        assert_eq!(clock.time_until_tick(), Some(Duration::from_millis(70)));
        time.advance(70);
        assert_eq!(clock.poll(1, 10), vec![2]);

        // A stall longer than an interval restarts from now, one word at a time
        time.advance(450);
        assert_eq!(clock.poll(2, 10), vec![3]);
        assert_eq!(clock.time_until_tick(), Some(Duration::from_millis(100)));
        assert!(clock.poll(3, 10).is_empty());
    }

    #[test]
    fn test_runs_to_the_end_without_overshoot() {
        let time = ManualTime::new();
        let mut clock = PlaybackClock::new(time.clone(), 50);
        let len = 4;
        let mut index = 0;
        clock.dispatch(ClockEvent::Play { index, len });

        for _ in 0..10 {
            time.advance(50);
            for next in clock.poll(index, len) {
                assert_eq!(next, index + 1);
                index = next;
            }
        }
        assert_eq!(index, len - 1);
        assert_eq!(clock.status(), PlaybackStatus::Stopped);
        assert!(!clock.has_pending_tick());
    }
}
