//! The init/step contract shared by every generator and solver.
//!
//! Each algorithm is created by its own constructor and advanced with
//! [`Stepper::step`], which returns a new state and never touches its input.
//! Stepping a finished state returns an equivalent state, so hosts can loop
//! until [`Status::is_terminal`] or keep old states around to rewind.

use crate::maze::{Coord, Grid};

/// Lifecycle of a steppable algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// More steps are needed.
    Running,
    /// Generation finished, or the goal was reached.
    Complete,
    /// A robot solver has no viable move or ran out of step budget.
    Stuck,
    /// A search solver emptied its frontier without reaching the goal.
    Exhausted,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }

    pub fn is_success(self) -> bool {
        matches!(self, Status::Complete)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Running => write!(f, "running"),
            Status::Complete => write!(f, "complete"),
            Status::Stuck => write!(f, "stuck"),
            Status::Exhausted => write!(f, "exhausted"),
        }
    }
}

pub trait Stepper: Clone {
    /// Produce the successor state. Must not mutate `self`, and must return an
    /// equivalent state once [`Stepper::status`] is terminal.
    fn step(&self) -> Self;

    fn status(&self) -> Status;

    fn step_count(&self) -> usize;

    /// The grid as seen by this state.
    fn grid(&self) -> &Grid;

    /// Cell to highlight, if any.
    fn current(&self) -> Option<Coord>;

    /// Cells the algorithm may pick from next (stack, frontier, walk, open set).
    fn frontier(&self) -> Vec<Coord>;

    /// Cells already settled (visited set, tree cells, visit-count keys).
    fn visited(&self) -> Vec<Coord>;

    /// Reconstructed or accumulated path; empty when there is none yet.
    fn path(&self) -> &[Coord];

    /// Rough completion percentage in `0..=100`.
    fn progress(&self) -> u8;

    /// Algorithm-specific one-line status.
    fn describe(&self) -> String;

    fn is_finished(&self) -> bool {
        self.status().is_terminal()
    }

    /// Steps until a terminal status is reached.
    fn run_to_completion(&self) -> Self {
        let mut state = self.clone();
        while !state.is_finished() {
            state = state.step();
        }
        state
    }
}
