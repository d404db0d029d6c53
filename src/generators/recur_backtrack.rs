use std::{collections::HashSet, rc::Rc};

use rand::{Rng, rngs::StdRng};

use super::Carve;
use crate::maze::{Coord, Grid, room_neighbors};

/// Depth-first carving with an explicit stack of visited rooms.
#[derive(Debug, Clone)]
pub(super) struct Backtrack {
    /// The stack will keep only path cells
    stack: Vec<Coord>,
    visited: HashSet<Coord>,
}

impl Backtrack {
    pub(super) fn init(grid: &mut Grid) -> (Self, Carve) {
        let start = grid.default_start();
        grid.open(start);
        let state = Backtrack {
            stack: vec![start],
            visited: HashSet::from([start]),
        };
        let carve = Carve {
            current: Some(start),
            complete: false,
        };
        (state, carve)
    }

    pub(super) fn step(&mut self, grid: &mut Rc<Grid>, rng: &mut StdRng) -> Carve {
        let Some(&cell) = self.stack.last() else {
            return Carve {
                current: None,
                complete: true,
            };
        };

        let view: &Grid = grid;
        let neighbors = room_neighbors(view, cell)
            .filter(|&(room, _)| !view.is_open(room))
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            // Dead end, backtrack
            self.stack.pop();
            return Carve {
                current: self.stack.last().copied(),
                complete: self.stack.is_empty(),
            };
        }

        let (room, connector) = neighbors[rng.random_range(0..neighbors.len())];
        let grid = Rc::make_mut(grid);
        grid.open(connector);
        grid.open(room);
        self.visited.insert(room);
        // Keep the cell below the neighbor so we can look at its other neighbors later
        self.stack.push(room);

        Carve {
            current: Some(room),
            complete: false,
        }
    }

    pub(super) fn stack(&self) -> &[Coord] {
        &self.stack
    }

    pub(super) fn visited(&self) -> impl Iterator<Item = &Coord> {
        self.visited.iter()
    }

    pub(super) fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
