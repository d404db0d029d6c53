use std::{collections::HashSet, rc::Rc};

use rand::{Rng, rngs::StdRng};

use super::Carve;
use crate::maze::{Coord, Grid, room_neighbors};

/// Growing-tree carving from a frontier of rooms adjacent to the tree.
#[derive(Debug, Clone)]
pub(super) struct PrimFrontier {
    /// Rooms next to the tree, without duplicates
    frontier: Vec<Coord>,
    visited: HashSet<Coord>,
}

impl PrimFrontier {
    pub(super) fn init(grid: &mut Grid) -> (Self, Carve) {
        let start = grid.default_start();
        grid.open(start);
        let frontier = room_neighbors(grid, start)
            .map(|(room, _)| room)
            .collect::<Vec<_>>();
        let carve = Carve {
            current: Some(start),
            complete: frontier.is_empty(),
        };
        let state = PrimFrontier {
            frontier,
            visited: HashSet::from([start]),
        };
        (state, carve)
    }

    pub(super) fn step(&mut self, grid: &mut Rc<Grid>, rng: &mut StdRng) -> Carve {
        if self.frontier.is_empty() {
            return Carve {
                current: None,
                complete: true,
            };
        }

        // Randomly select a cell from the frontier
        let idx = rng.random_range(0..self.frontier.len());
        let cell = self.frontier.swap_remove(idx);

        let view: &Grid = grid;
        let in_tree = room_neighbors(view, cell)
            .filter(|(room, _)| self.visited.contains(room))
            .collect::<Vec<_>>();

        if !in_tree.is_empty() {
            // Connect the cell to a random neighbor that is already in the maze
            let (_, connector) = in_tree[rng.random_range(0..in_tree.len())];
            let grid = Rc::make_mut(grid);
            grid.open(cell);
            grid.open(connector);
            self.visited.insert(cell);

            let new_frontier = room_neighbors(grid, cell)
                .map(|(room, _)| room)
                .filter(|room| !self.visited.contains(room))
                .collect::<Vec<_>>();
            for room in new_frontier {
                // Only add the cell if it hasn't been added to the frontier before
                if !self.frontier.contains(&room) {
                    self.frontier.push(room);
                }
            }
        }

        Carve {
            current: Some(cell),
            complete: self.frontier.is_empty(),
        }
    }

    pub(super) fn frontier(&self) -> &[Coord] {
        &self.frontier
    }

    pub(super) fn visited(&self) -> impl Iterator<Item = &Coord> {
        self.visited.iter()
    }

    pub(super) fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
