//! Host-side stepping: pacing, rewinding and racing.
//!
//! Nothing here runs on its own. The host calls [`Driver::tick`] or
//! [`Race::tick`] from its frame loop with the current time, and they step
//! the underlying algorithms only when the configured interval has passed.

mod history;
mod race;

use std::time::{Duration, Instant};

pub use history::History;
pub use race::{LaneStats, Race};

use crate::{config::PlaybackConfig, stepping::Stepper};

/// Playback speed and pause state shared by drivers and races.
#[derive(Debug, Clone)]
pub struct Pace {
    interval: Duration,
    min_interval: Duration,
    max_interval: Duration,
    last_tick: Option<Instant>,
    paused: bool,
}

impl Pace {
    pub fn new(playback: &PlaybackConfig) -> Self {
        let min_interval = Duration::from_millis(playback.min_interval_ms);
        let max_interval = Duration::from_millis(playback.max_interval_ms).max(min_interval);
        Pace {
            interval: Duration::from_millis(playback.interval_ms).clamp(min_interval, max_interval),
            min_interval,
            max_interval,
            last_tick: None,
            paused: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a step should happen at `now`. Records `now` as the last tick if so.
    pub fn due(&mut self, now: Instant) -> bool {
        if self.paused {
            return false;
        }
        let due = self
            .last_tick
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.last_tick = Some(now);
        }
        due
    }

    /// Halves the interval, down to the minimum.
    pub fn speed_up(&mut self) {
        self.interval = (self.interval / 2).max(self.min_interval);
        tracing::debug!("[pace] interval {:?}", self.interval);
    }

    /// Doubles the interval, up to the maximum.
    pub fn slow_down(&mut self) {
        self.interval = (self.interval * 2).min(self.max_interval);
        tracing::debug!("[pace] interval {:?}", self.interval);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

/// Steps a single algorithm instance and remembers where it has been.
#[derive(Debug, Clone)]
pub struct Driver<S: Stepper> {
    history: History<S>,
    pace: Pace,
    /// Time of the first step since the last reset
    started_at: Option<Instant>,
    last_step_at: Option<Instant>,
}

impl<S: Stepper> Driver<S> {
    pub fn new(initial: S, playback: &PlaybackConfig) -> Self {
        Driver {
            history: History::new(initial, playback.max_history),
            pace: Pace::new(playback),
            started_at: None,
            last_step_at: None,
        }
    }

    pub fn current(&self) -> &S {
        self.history.current()
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn pace(&self) -> &Pace {
        &self.pace
    }

    pub fn pace_mut(&mut self) -> &mut Pace {
        &mut self.pace
    }

    /// Advances one step. Returns `false` if the current state was already finished.
    pub fn step_forward(&mut self) -> bool {
        self.step_at(Instant::now())
    }

    fn step_at(&mut self, now: Instant) -> bool {
        let current = self.history.current();
        if current.is_finished() {
            return false;
        }
        let next = current.step();
        self.history.push(next);
        self.started_at.get_or_insert(now);
        self.last_step_at = Some(now);
        true
    }

    /// Rewinds one step. Returns `false` at the oldest retained state.
    pub fn step_back(&mut self) -> bool {
        self.history.pop()
    }

    /// Steps until the current state is finished.
    pub fn run_to_completion(&mut self) {
        let mut steps = 0usize;
        while self.step_forward() {
            steps += 1;
        }
        tracing::debug!(
            "[driver] ran {} steps to completion: {}",
            steps,
            self.current().status()
        );
    }

    /// Drops all history and starts over from `initial`.
    pub fn reset(&mut self, initial: S) {
        self.history.reset(initial);
        self.started_at = None;
        self.last_step_at = None;
    }

    /// Steps once if the interval has elapsed since the last tick and
    /// playback is not paused.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.current().is_finished() || !self.pace.due(now) {
            return false;
        }
        self.step_at(now)
    }

    /// Time between the first and the most recent step.
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.last_step_at) {
            (Some(first), Some(last)) => last.saturating_duration_since(first),
            _ => Duration::ZERO,
        }
    }
}
