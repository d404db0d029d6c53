//! Local-knowledge solvers. A robot only senses the four cells around it,
//! remembers how often it stood on each cell, and moves one cell per step.

mod pledge;
mod random_walk;
mod tremaux;

use std::collections::HashMap;

use rand::rngs::StdRng;
use serde::Deserialize;

pub(super) use pledge::Pledge;
pub(super) use random_walk::RandomWalk;
pub(super) use tremaux::Tremaux;

use crate::maze::{Coord, Direction, Grid};

/// Step budgets and loop-escape thresholds for the robot solvers.
/// Budgets are multiplied by the number of cells in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RobotLimits {
    pub random_walk_budget_factor: usize,
    pub pledge_budget_factor: usize,
    pub tremaux_budget_factor: usize,
    /// Full turns a Pledge robot must accumulate before it suspects a loop
    pub pledge_loop_turns: u32,
    /// Visits to the current cell, beyond which a Pledge robot breaks out
    pub pledge_loop_revisits: u32,
}

impl Default for RobotLimits {
    fn default() -> Self {
        RobotLimits {
            random_walk_budget_factor: 3,
            pledge_budget_factor: 4,
            tremaux_budget_factor: 8,
            pledge_loop_turns: 2,
            pledge_loop_revisits: 3,
        }
    }
}

/// What the robot knows when choosing its next move.
pub(super) struct Senses<'a> {
    pub grid: &'a Grid,
    pub current: Coord,
    pub goal: Coord,
    pub facing: Direction,
    pub previous: Option<Coord>,
    pub visits: &'a HashMap<Coord, u32>,
}

impl Senses<'_> {
    pub fn visits(&self, coord: Coord) -> u32 {
        self.visits.get(&coord).copied().unwrap_or(0)
    }

    /// The neighbor in `dir`, if it is open.
    pub fn look(&self, dir: Direction) -> Option<Coord> {
        dir.offset(self.current, 1)
            .filter(|&next| self.grid.is_open(next))
    }
}

#[derive(Clone)]
pub(super) enum Brain {
    Pledge(Pledge),
    Tremaux(Tremaux),
    RandomWalk(RandomWalk),
}

/// Shared robot body: heading, memory and step budget.
#[derive(Clone)]
pub(super) struct Robot {
    facing: Direction,
    previous: Option<Coord>,
    visits: HashMap<Coord, u32>,
    budget: usize,
    brain: Brain,
}

impl Robot {
    pub(super) fn new(start: Coord, budget: usize, brain: Brain) -> Self {
        Robot {
            facing: Direction::East,
            previous: None,
            visits: HashMap::from([(start, 1)]),
            budget,
            brain,
        }
    }

    pub(super) fn pledge(limits: &RobotLimits) -> Brain {
        Brain::Pledge(Pledge::new(limits.pledge_loop_turns, limits.pledge_loop_revisits))
    }

    pub(super) fn tremaux(rng: StdRng) -> Brain {
        Brain::Tremaux(Tremaux::new(rng))
    }

    pub(super) fn random_walk(rng: StdRng) -> Brain {
        Brain::RandomWalk(RandomWalk::new(rng))
    }

    /// Chooses and takes one move. `None` when every neighbor is a wall.
    pub(super) fn advance(&mut self, grid: &Grid, current: Coord, goal: Coord) -> Option<Coord> {
        let senses = Senses {
            grid,
            current,
            goal,
            facing: self.facing,
            previous: self.previous,
            visits: &self.visits,
        };
        let (dir, next) = match &mut self.brain {
            Brain::Pledge(brain) => brain.choose(&senses),
            Brain::Tremaux(brain) => brain.choose(&senses),
            Brain::RandomWalk(brain) => brain.choose(&senses),
        }?;

        self.facing = dir;
        self.previous = Some(current);
        *self.visits.entry(next).or_insert(0) += 1;
        Some(next)
    }

    pub(super) fn budget(&self) -> usize {
        self.budget
    }

    pub(super) fn facing(&self) -> Direction {
        self.facing
    }

    pub(super) fn visits(&self) -> &HashMap<Coord, u32> {
        &self.visits
    }

    pub(super) fn visit_count(&self, coord: Coord) -> u32 {
        self.visits.get(&coord).copied().unwrap_or(0)
    }

    pub(super) fn brain(&self) -> &Brain {
        &self.brain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn corridor() -> Grid {
        Grid::from_rows(&["#####", "#...#", "#####", "#####", "#####"]).unwrap()
    }

    #[test]
    fn test_limits_defaults() {
        let limits = RobotLimits::default();
        assert_eq!(limits.random_walk_budget_factor, 3);
        assert_eq!(limits.pledge_budget_factor, 4);
        assert_eq!(limits.pledge_loop_turns, 2);
        assert_eq!(limits.pledge_loop_revisits, 3);
    }

    #[test]
    fn test_advance_updates_memory() {
        let grid = corridor();
        let brain = Robot::random_walk(StdRng::seed_from_u64(0));
        let mut robot = Robot::new((1, 1), 10, brain);
        let next = robot.advance(&grid, (1, 1), (3, 1));
        assert_eq!(next, Some((2, 1)));
        assert_eq!(robot.facing(), Direction::East);
        assert_eq!(robot.visit_count((1, 1)), 1);
        assert_eq!(robot.visit_count((2, 1)), 1);
        assert_eq!(robot.previous, Some((1, 1)));
    }

    #[test]
    fn test_walled_in_robot_cannot_move() {
        let grid = Grid::new(5).unwrap();
        for brain in [
            Robot::pledge(&RobotLimits::default()),
            Robot::tremaux(StdRng::seed_from_u64(0)),
            Robot::random_walk(StdRng::seed_from_u64(0)),
        ] {
            let mut robot = Robot::new((1, 1), 10, brain);
            assert_eq!(robot.advance(&grid, (1, 1), (3, 3)), None);
        }
    }

    #[test]
    fn test_senses_look() {
        let grid = corridor();
        let visits = HashMap::new();
        let senses = Senses {
            grid: &grid,
            current: (2, 1),
            goal: (3, 1),
            facing: Direction::East,
            previous: None,
            visits: &visits,
        };
        assert_eq!(senses.look(Direction::East), Some((3, 1)));
        assert_eq!(senses.look(Direction::North), None);
        assert_eq!(senses.visits((2, 1)), 0);
    }
}
