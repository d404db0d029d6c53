use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use super::{History, Pace};
use crate::{
    config::PlaybackConfig,
    error::Result,
    maze::{Coord, Grid},
    solvers::{Family, RobotLimits, Solve, Solver},
    stepping::{Status, Stepper},
};

/// Outcome of one lane, recorded the moment it stops running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneStats {
    pub solver: Solver,
    pub status: Status,
    pub steps: usize,
    pub path_len: usize,
    /// From the first race step to the step that finished this lane
    pub elapsed: Duration,
}

/// Several solvers advanced in lock-step over one shared grid.
pub struct Race {
    grid: Rc<Grid>,
    history: History<Vec<Solve>>,
    stats: Vec<Option<LaneStats>>,
    pace: Pace,
    started_at: Option<Instant>,
}

impl Race {
    /// Races every solver of `family` from the grid's conventional start to its goal.
    pub fn new(
        family: Family,
        grid: Rc<Grid>,
        seed: Option<u64>,
        limits: &RobotLimits,
        playback: &PlaybackConfig,
    ) -> Result<Self> {
        let (start, goal) = (grid.default_start(), grid.default_goal());
        Race::with_solvers(&family.solvers(), grid, start, goal, seed, limits, playback)
    }

    pub fn with_solvers(
        solvers: &[Solver],
        grid: Rc<Grid>,
        start: Coord,
        goal: Coord,
        seed: Option<u64>,
        limits: &RobotLimits,
        playback: &PlaybackConfig,
    ) -> Result<Self> {
        let lanes = solvers
            .iter()
            .enumerate()
            .map(|(i, &solver)| {
                // Each lane gets its own stream so lanes do not mirror each other
                let seed = seed.map(|s| s.wrapping_add(i as u64));
                Solve::with_limits(solver, Rc::clone(&grid), start, goal, seed, limits)
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(
            "[race] {} lanes from {:?} to {:?}",
            lanes.len(),
            start,
            goal
        );

        let mut race = Race {
            grid,
            stats: vec![None; lanes.len()],
            history: History::new(lanes, playback.max_history),
            pace: Pace::new(playback),
            started_at: None,
        };
        // Lanes that start finished (e.g. start == goal) have trivial stats
        race.record(Duration::ZERO);
        Ok(race)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn lanes(&self) -> &[Solve] {
        self.history.current()
    }

    pub fn stats(&self) -> &[Option<LaneStats>] {
        &self.stats
    }

    pub fn pace(&self) -> &Pace {
        &self.pace
    }

    pub fn pace_mut(&mut self) -> &mut Pace {
        &mut self.pace
    }

    pub fn is_finished(&self) -> bool {
        self.lanes().iter().all(|lane| lane.is_finished())
    }

    /// Steps every running lane once. Returns `false` if none was running.
    pub fn step_all(&mut self) -> bool {
        self.step_at(Instant::now())
    }

    fn step_at(&mut self, now: Instant) -> bool {
        if self.is_finished() {
            return false;
        }
        let started_at = *self.started_at.get_or_insert(now);
        let next = self
            .lanes()
            .iter()
            .map(|lane| lane.step())
            .collect::<Vec<_>>();
        self.history.push(next);
        self.record(now.saturating_duration_since(started_at));
        true
    }

    /// Fills in stats for lanes that just stopped running.
    fn record(&mut self, elapsed: Duration) {
        let lanes = self.history.current();
        for (slot, lane) in self.stats.iter_mut().zip(lanes) {
            if slot.is_none() && lane.is_finished() {
                let stats = LaneStats {
                    solver: lane.solver(),
                    status: lane.status(),
                    steps: lane.step_count(),
                    path_len: lane.path().len(),
                    elapsed,
                };
                tracing::info!(
                    "[race] {} {} in {} steps, path length {}, {:?}",
                    stats.solver,
                    stats.status,
                    stats.steps,
                    stats.path_len,
                    stats.elapsed
                );
                *slot = Some(stats);
            }
        }
    }

    /// Rewinds one lock-step. Stats of lanes that are running again are forgotten.
    pub fn step_back(&mut self) -> bool {
        if !self.history.pop() {
            return false;
        }
        let lanes = self.history.current();
        for (slot, lane) in self.stats.iter_mut().zip(lanes) {
            if !lane.is_finished() {
                *slot = None;
            }
        }
        true
    }

    pub fn run_to_completion(&mut self) {
        while self.step_all() {}
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        if self.is_finished() || !self.pace.due(now) {
            return false;
        }
        self.step_at(now)
    }
}
