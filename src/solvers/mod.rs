use std::rc::Rc;

use serde::Deserialize;

mod robot;
mod search;

pub use robot::RobotLimits;

use robot::{Brain, Robot};
use search::{Expansion, Search};

use crate::{
    error::{LabError, Result},
    generators::get_rng,
    maze::{Coord, Direction, Grid},
    stepping::{Status, Stepper},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Bfs,
    Dfs,
    AStar,
    Pledge,
    Tremaux,
    RandomWalk,
}

/// Solvers that are compared against each other in a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Full knowledge of the grid
    #[default]
    ShortestPath,
    /// Only the neighboring cells are known
    Robot,
}

impl Solver {
    pub const ALL: [Solver; 6] = [
        Solver::Bfs,
        Solver::Dfs,
        Solver::AStar,
        Solver::Pledge,
        Solver::Tremaux,
        Solver::RandomWalk,
    ];

    pub fn family(self) -> Family {
        match self {
            Solver::Bfs | Solver::Dfs | Solver::AStar => Family::ShortestPath,
            Solver::Pledge | Solver::Tremaux | Solver::RandomWalk => Family::Robot,
        }
    }
}

impl Family {
    pub fn solvers(self) -> [Solver; 3] {
        match self {
            Family::ShortestPath => [Solver::Bfs, Solver::Dfs, Solver::AStar],
            Family::Robot => [Solver::Pledge, Solver::Tremaux, Solver::RandomWalk],
        }
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::Pledge => write!(f, "Pledge Algorithm"),
            Solver::Tremaux => write!(f, "Tremaux's Algorithm"),
            Solver::RandomWalk => write!(f, "Random Walk"),
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::ShortestPath => write!(f, "shortest path"),
            Family::Robot => write!(f, "robot"),
        }
    }
}

#[derive(Clone)]
enum Strategy {
    Search(Search),
    Robot(Robot),
}

/// State of a solver run on a fixed grid.
///
/// The grid is shared and never written, so racing lanes and rewind
/// history all point at the same allocation.
#[derive(Clone)]
pub struct Solve {
    solver: Solver,
    grid: Rc<Grid>,
    start: Coord,
    goal: Coord,
    current: Option<Coord>,
    step_count: usize,
    status: Status,
    /// Reconstructed path for searches, accumulated trail for robots
    path: Vec<Coord>,
    open_cells: usize,
    strategy: Strategy,
}

impl Solve {
    /// Starts `solver` from `start` with default robot limits.
    pub fn new(
        solver: Solver,
        grid: Rc<Grid>,
        start: Coord,
        goal: Coord,
        seed: Option<u64>,
    ) -> Result<Self> {
        Self::with_limits(solver, grid, start, goal, seed, &RobotLimits::default())
    }

    pub fn with_limits(
        solver: Solver,
        grid: Rc<Grid>,
        start: Coord,
        goal: Coord,
        seed: Option<u64>,
        limits: &RobotLimits,
    ) -> Result<Self> {
        for coord in [start, goal] {
            if !grid.in_bounds(coord) {
                return Err(LabError::OutOfBounds(coord));
            }
            if !grid.is_open(coord) {
                return Err(LabError::Blocked(coord));
            }
        }

        let cells = grid.cell_count();
        let strategy = match solver {
            Solver::Bfs => Strategy::Search(Search::bfs(start)),
            Solver::Dfs => Strategy::Search(Search::dfs(start)),
            Solver::AStar => Strategy::Search(Search::astar(start, goal)),
            Solver::Pledge => Strategy::Robot(Robot::new(
                start,
                limits.pledge_budget_factor * cells,
                Robot::pledge(limits),
            )),
            Solver::Tremaux => Strategy::Robot(Robot::new(
                start,
                limits.tremaux_budget_factor * cells,
                Robot::tremaux(get_rng(seed)),
            )),
            Solver::RandomWalk => Strategy::Robot(Robot::new(
                start,
                limits.random_walk_budget_factor * cells,
                Robot::random_walk(get_rng(seed)),
            )),
        };

        let (status, current, path) = if start == goal {
            (Status::Complete, Some(start), vec![start])
        } else {
            match &strategy {
                Strategy::Search(_) => (Status::Running, None, Vec::new()),
                Strategy::Robot(_) => (Status::Running, Some(start), vec![start]),
            }
        };
        let open_cells = grid.coords().filter(|&c| grid.is_open(c)).count();
        tracing::debug!(
            "[{}] starting at {:?} towards {:?}",
            solver,
            start,
            goal
        );

        Ok(Solve {
            solver,
            grid,
            start,
            goal,
            current,
            step_count: 0,
            status,
            path,
            open_cells,
            strategy,
        })
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    pub fn shared_grid(&self) -> Rc<Grid> {
        Rc::clone(&self.grid)
    }

    /// Times a robot has stood on `coord`. Always zero for searches.
    pub fn visit_count(&self, coord: Coord) -> u32 {
        match &self.strategy {
            Strategy::Search(_) => 0,
            Strategy::Robot(robot) => robot.visit_count(coord),
        }
    }

    /// Heading of a robot solver.
    pub fn facing(&self) -> Option<Direction> {
        match &self.strategy {
            Strategy::Search(_) => None,
            Strategy::Robot(robot) => Some(robot.facing()),
        }
    }

    /// Accumulated turning angle of a Pledge robot, in degrees.
    pub fn pledge_angle(&self) -> Option<i64> {
        match &self.strategy {
            Strategy::Robot(robot) => match robot.brain() {
                Brain::Pledge(pledge) => Some(pledge.angle()),
                _ => None,
            },
            Strategy::Search(_) => None,
        }
    }

    fn step_search(&mut self) {
        let Strategy::Search(search) = &mut self.strategy else {
            return;
        };
        match search.step(&self.grid, self.goal) {
            Expansion::Expanded(coord) => {
                self.current = Some(coord);
                self.step_count += 1;
                if search.is_frontier_empty() {
                    self.status = Status::Exhausted;
                }
            }
            Expansion::Found(path) => {
                self.current = Some(self.goal);
                self.step_count += 1;
                self.path = path;
                self.status = Status::Complete;
            }
            Expansion::Exhausted => {
                self.current = None;
                self.status = Status::Exhausted;
            }
        }
    }

    fn step_robot(&mut self) {
        let Strategy::Robot(robot) = &mut self.strategy else {
            return;
        };
        let Some(current) = self.current else {
            self.status = Status::Stuck;
            return;
        };
        if self.step_count >= robot.budget() {
            self.status = Status::Stuck;
            return;
        }
        match robot.advance(&self.grid, current, self.goal) {
            Some(next) => {
                self.current = Some(next);
                self.path.push(next);
                self.step_count += 1;
                if next == self.goal {
                    self.status = Status::Complete;
                }
            }
            None => self.status = Status::Stuck,
        }
    }
}

impl Stepper for Solve {
    fn step(&self) -> Self {
        if self.status.is_terminal() {
            return self.clone();
        }

        let mut next = self.clone();
        match next.strategy {
            Strategy::Search(_) => next.step_search(),
            Strategy::Robot(_) => next.step_robot(),
        }

        if next.status.is_terminal() {
            tracing::debug!(
                "[{}] {} after {} steps, path length {}",
                next.solver,
                next.status,
                next.step_count,
                next.path.len()
            );
        }
        next
    }

    fn status(&self) -> Status {
        self.status
    }

    fn step_count(&self) -> usize {
        self.step_count
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn current(&self) -> Option<Coord> {
        self.current
    }

    fn frontier(&self) -> Vec<Coord> {
        match &self.strategy {
            Strategy::Search(search) => search.frontier(),
            Strategy::Robot(_) => Vec::new(),
        }
    }

    fn visited(&self) -> Vec<Coord> {
        match &self.strategy {
            Strategy::Search(search) => search.visited().copied().collect(),
            Strategy::Robot(robot) => robot.visits().keys().copied().collect(),
        }
    }

    fn path(&self) -> &[Coord] {
        &self.path
    }

    fn progress(&self) -> u8 {
        if self.status.is_terminal() {
            return 100;
        }
        let (done, total) = match &self.strategy {
            Strategy::Search(search) => (search.visited_count(), self.open_cells),
            Strategy::Robot(robot) => (self.step_count, robot.budget()),
        };
        if total == 0 {
            return 0;
        }
        (done * 100 / total).min(99) as u8
    }

    fn describe(&self) -> String {
        match &self.strategy {
            Strategy::Search(search) => format!(
                "open: {} | visited: {}",
                search.frontier().len(),
                search.visited_count()
            ),
            Strategy::Robot(robot) => match robot.brain() {
                Brain::Pledge(pledge) => format!(
                    "angle: {}° | steps: {}/{}{}",
                    pledge.angle(),
                    self.step_count,
                    robot.budget(),
                    if pledge.is_hugging() { " | wall only" } else { "" }
                ),
                Brain::Tremaux(_) => format!(
                    "marked cells: {} | steps: {}/{}",
                    robot.visits().len(),
                    self.step_count,
                    robot.budget()
                ),
                Brain::RandomWalk(_) => {
                    format!("steps: {}/{}", self.step_count, robot.budget())
                }
            },
        }
    }
}
