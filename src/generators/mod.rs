use std::rc::Rc;

use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;

mod binary_tree;
mod kruskal;
mod prim;
mod recur_backtrack;
mod union_find;
mod wilson;

use binary_tree::Cursor;
use kruskal::EdgeQueue;
use prim::PrimFrontier;
use recur_backtrack::Backtrack;
use wilson::Walk;

pub use union_find::UnionFind;

use crate::{
    error::Result,
    maze::{Coord, Grid},
    stepping::{Status, Stepper},
};

/// Get a random number generator, optionally seeded for reproducibility.
pub(crate) fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generator {
    #[default]
    RecurBacktrack,
    Prim,
    Kruskal,
    Wilson,
    BinaryTree,
}

impl Generator {
    pub const ALL: [Generator; 5] = [
        Generator::RecurBacktrack,
        Generator::Prim,
        Generator::Kruskal,
        Generator::Wilson,
        Generator::BinaryTree,
    ];
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::RecurBacktrack => write!(f, "Recursive Backtracker"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
            Generator::Wilson => write!(f, "Wilson's Algorithm"),
            Generator::BinaryTree => write!(f, "Binary Tree"),
        }
    }
}

/// What a single carving step did.
#[derive(Debug, Clone, Copy)]
struct Carve {
    current: Option<Coord>,
    complete: bool,
}

/// Algorithm-specific bookkeeping.
#[derive(Debug, Clone)]
enum Frontier {
    RecurBacktrack(Backtrack),
    Prim(PrimFrontier),
    Kruskal(EdgeQueue),
    Wilson(Walk),
    BinaryTree(Cursor),
}

/// State of a maze generation run.
///
/// Cloning is cheap for the grid, which is shared until a step writes to it,
/// so the previous states kept for rewinding never observe later carving.
#[derive(Clone)]
pub struct Generation {
    generator: Generator,
    grid: Rc<Grid>,
    current: Option<Coord>,
    step_count: usize,
    complete: bool,
    rng: StdRng,
    frontier: Frontier,
}

impl Generation {
    /// Starts a generation run on a fresh `size`×`size` grid of walls.
    pub fn new(generator: Generator, size: u16, seed: Option<u64>) -> Result<Self> {
        let mut grid = Grid::new(size)?;
        let mut rng = get_rng(seed);

        let (frontier, carve) = match generator {
            Generator::RecurBacktrack => {
                let (state, carve) = Backtrack::init(&mut grid);
                (Frontier::RecurBacktrack(state), carve)
            }
            Generator::Prim => {
                let (state, carve) = PrimFrontier::init(&mut grid);
                (Frontier::Prim(state), carve)
            }
            Generator::Kruskal => {
                let (state, carve) = EdgeQueue::init(&mut grid, &mut rng);
                (Frontier::Kruskal(state), carve)
            }
            Generator::Wilson => {
                let (state, carve) = Walk::init(&mut grid, &mut rng);
                (Frontier::Wilson(state), carve)
            }
            Generator::BinaryTree => {
                let (state, carve) = Cursor::init(&mut grid);
                (Frontier::BinaryTree(state), carve)
            }
        };
        tracing::debug!("[{}] initialized {}x{} grid", generator, size, size);

        Ok(Generation {
            generator,
            grid: Rc::new(grid),
            current: carve.current,
            step_count: 0,
            complete: carve.complete,
            rng,
            frontier,
        })
    }

    pub fn generator(&self) -> Generator {
        self.generator
    }

    /// Shared handle to the grid, e.g. to hand a finished maze to solvers.
    pub fn shared_grid(&self) -> Rc<Grid> {
        Rc::clone(&self.grid)
    }

    /// Consumes the state and returns the grid, cloning only if it is still shared.
    pub fn into_grid(self) -> Grid {
        Rc::unwrap_or_clone(self.grid)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// `(done, total)` units of work, in the algorithm's own terms.
    fn work(&self) -> (usize, usize) {
        let rooms = self.grid.room_count();
        match &self.frontier {
            Frontier::RecurBacktrack(state) => (state.visited_count(), rooms),
            Frontier::Prim(state) => (state.visited_count(), rooms),
            Frontier::Kruskal(state) => (state.processed(), state.total()),
            Frontier::Wilson(state) => (state.in_tree_count(), rooms),
            Frontier::BinaryTree(state) => (state.processed(), state.total()),
        }
    }
}

impl Stepper for Generation {
    fn step(&self) -> Self {
        if self.complete {
            return self.clone();
        }

        let mut next = self.clone();
        let carve = match &mut next.frontier {
            Frontier::RecurBacktrack(state) => state.step(&mut next.grid, &mut next.rng),
            Frontier::Prim(state) => state.step(&mut next.grid, &mut next.rng),
            Frontier::Kruskal(state) => state.step(&mut next.grid),
            Frontier::Wilson(state) => state.step(&mut next.grid, &mut next.rng),
            Frontier::BinaryTree(state) => state.step(&mut next.grid, &mut next.rng),
        };
        next.step_count += 1;
        next.complete = carve.complete;
        next.current = if carve.complete { None } else { carve.current };

        if next.complete {
            tracing::debug!(
                "[{}] maze complete after {} steps",
                next.generator,
                next.step_count
            );
        }
        next
    }

    fn status(&self) -> Status {
        if self.complete {
            Status::Complete
        } else {
            Status::Running
        }
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
        match &self.frontier {
            Frontier::RecurBacktrack(state) => state.stack().to_vec(),
            Frontier::Prim(state) => state.frontier().to_vec(),
            Frontier::Kruskal(state) => state.pending_connectors(),
            Frontier::Wilson(state) => state.walk().to_vec(),
            Frontier::BinaryTree(state) => state.remaining().to_vec(),
        }
    }

    fn visited(&self) -> Vec<Coord> {
        match &self.frontier {
            Frontier::RecurBacktrack(state) => state.visited().copied().collect(),
            Frontier::Prim(state) => state.visited().copied().collect(),
            // Every room is carved up front, nothing to mark
            Frontier::Kruskal(_) => Vec::new(),
            Frontier::Wilson(state) => state.in_tree().copied().collect(),
            Frontier::BinaryTree(state) => state.done().to_vec(),
        }
    }

    fn path(&self) -> &[Coord] {
        match &self.frontier {
            Frontier::Wilson(state) => state.walk(),
            _ => &[],
        }
    }

    fn progress(&self) -> u8 {
        if self.complete {
            return 100;
        }
        let (done, total) = self.work();
        if total == 0 {
            return 0;
        }
        (done * 100 / total).min(99) as u8
    }

    fn describe(&self) -> String {
        if self.complete {
            return "complete".to_string();
        }
        match &self.frontier {
            Frontier::RecurBacktrack(state) => format!("stack size: {}", state.stack().len()),
            Frontier::Prim(state) => format!("frontier: {}", state.frontier().len()),
            Frontier::Kruskal(state) => {
                format!("processed edges: {}/{}", state.processed(), state.total())
            }
            Frontier::Wilson(state) => format!(
                "unvisited: {} | walk length: {}",
                state.unvisited_count(),
                state.walk().len()
            ),
            Frontier::BinaryTree(state) => {
                format!("processed: {}/{}", state.processed(), state.total())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(generator: Generator, size: u16, seed: u64) -> Generation {
        Generation::new(generator, size, Some(seed))
            .unwrap()
            .run_to_completion()
    }

    #[test]
    fn test_every_generator_builds_a_perfect_maze() {
        for generator in Generator::ALL {
            for (seed, size) in [(1, 5), (2, 7), (3, 13)] {
                let state = generate(generator, size, seed);
                let grid = state.grid();
                assert!(grid.is_perfect(), "{} size {}", generator, size);
                assert_eq!(grid.open_connector_count(), grid.room_count() - 1);
                assert!(grid.room_cells().iter().all(|&c| grid.is_open(c)));
                assert_eq!(state.current(), None);
                assert_eq!(state.progress(), 100);
            }
        }
    }

    #[test]
    fn test_step_does_not_touch_previous_state() {
        for generator in Generator::ALL {
            let first = Generation::new(generator, 9, Some(11)).unwrap();
            let before = first.grid().clone();
            let mut state = first.clone();
            for _ in 0..10 {
                state = state.step();
            }
            assert_eq!(first.grid(), &before, "{}", generator);
            assert_eq!(first.step_count(), 0);
        }
    }

    #[test]
    fn test_stepping_is_reproducible() {
        for generator in Generator::ALL {
            let state = Generation::new(generator, 11, Some(5)).unwrap();
            let a = state.step().step().step();
            let b = state.step().step().step();
            assert_eq!(a.grid(), b.grid());
            assert_eq!(a.current(), b.current());
            assert_eq!(generate(generator, 11, 9).grid(), generate(generator, 11, 9).grid());
        }
    }

    #[test]
    fn test_step_on_complete_is_a_no_op() {
        let done = generate(Generator::Kruskal, 9, 4);
        let again = done.step();
        assert_eq!(again.status(), Status::Complete);
        assert_eq!(again.step_count(), done.step_count());
        assert_eq!(again.grid(), done.grid());
        assert_eq!(again.describe(), "complete");
    }

    #[test]
    fn test_into_grid_keeps_carving() {
        let state = generate(Generator::Prim, 9, 8);
        let expected = state.grid().clone();
        assert_eq!(state.into_grid(), expected);
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        assert!(Generation::new(Generator::Wilson, 8, None).is_err());
    }

    #[test]
    fn test_describe_reports_algorithm_status() {
        let state = Generation::new(Generator::RecurBacktrack, 7, Some(1)).unwrap();
        assert_eq!(state.describe(), "stack size: 1");
        let state = Generation::new(Generator::BinaryTree, 7, Some(1)).unwrap();
        assert_eq!(state.describe(), "processed: 0/9");
        let state = Generation::new(Generator::Kruskal, 7, Some(1)).unwrap();
        assert_eq!(state.describe(), "processed edges: 0/12");
    }
}
