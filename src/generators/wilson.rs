use std::{collections::HashSet, rc::Rc};

use rand::{Rng, rngs::StdRng};

use super::Carve;
use crate::maze::{Coord, Grid, connector_between, room_neighbors};

/// Loop-erased random walk towards the growing tree.
#[derive(Debug, Clone)]
pub(super) struct Walk {
    in_tree: HashSet<Coord>,
    /// Rooms not yet in the tree, in room order
    unvisited: Vec<Coord>,
    /// Current walk, from its start to the walker
    path: Vec<Coord>,
}

impl Walk {
    pub(super) fn init(grid: &mut Grid, rng: &mut StdRng) -> (Self, Carve) {
        let mut unvisited = grid.room_cells();
        for &room in &unvisited {
            grid.open(room);
        }

        let first = unvisited.remove(rng.random_range(0..unvisited.len()));
        let path = if unvisited.is_empty() {
            Vec::new()
        } else {
            vec![unvisited[rng.random_range(0..unvisited.len())]]
        };

        let carve = Carve {
            current: path.first().copied(),
            complete: path.is_empty(),
        };
        let state = Walk {
            in_tree: HashSet::from([first]),
            unvisited,
            path,
        };
        (state, carve)
    }

    pub(super) fn step(&mut self, grid: &mut Rc<Grid>, rng: &mut StdRng) -> Carve {
        let Some(&walker) = self.path.last() else {
            return Carve {
                current: None,
                complete: true,
            };
        };

        if self.in_tree.contains(&walker) {
            self.commit(grid);
            if self.unvisited.is_empty() {
                return Carve {
                    current: None,
                    complete: true,
                };
            }
            let start = self.unvisited[rng.random_range(0..self.unvisited.len())];
            self.path.push(start);
            return Carve {
                current: Some(start),
                complete: false,
            };
        }

        let view: &Grid = grid;
        let options = room_neighbors(view, walker)
            .map(|(room, _)| room)
            .collect::<Vec<_>>();
        let next = options[rng.random_range(0..options.len())];

        // Erase the loop instead of extending the walk over itself
        match self.path.iter().position(|&c| c == next) {
            Some(i) => self.path.truncate(i + 1),
            None => self.path.push(next),
        }

        Carve {
            current: Some(next),
            complete: false,
        }
    }

    /// Carves the whole walk into the grid and adds its rooms to the tree.
    fn commit(&mut self, grid: &mut Rc<Grid>) {
        let grid = Rc::make_mut(grid);
        for pair in self.path.windows(2) {
            grid.open(connector_between(pair[0], pair[1]));
        }
        self.in_tree.extend(self.path.drain(..));
        let in_tree = &self.in_tree;
        self.unvisited.retain(|room| !in_tree.contains(room));
    }

    pub(super) fn walk(&self) -> &[Coord] {
        &self.path
    }

    pub(super) fn in_tree(&self) -> impl Iterator<Item = &Coord> {
        self.in_tree.iter()
    }

    pub(super) fn in_tree_count(&self) -> usize {
        self.in_tree.len()
    }

    pub(super) fn unvisited_count(&self) -> usize {
        self.unvisited.len()
    }
}
