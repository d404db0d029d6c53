use std::rc::Rc;

use rand::{Rng, rngs::StdRng};

use super::Carve;
use crate::maze::{Coord, Grid};

/// Visits rooms in order and links each one north or east.
/// The result always has a full corridor along the top row and the right column.
#[derive(Debug, Clone)]
pub(super) struct Cursor {
    cells: Rc<[Coord]>,
    index: usize,
}

impl Cursor {
    pub(super) fn init(grid: &mut Grid) -> (Self, Carve) {
        let cells = grid.room_cells();
        for &room in &cells {
            grid.open(room);
        }
        let carve = Carve {
            current: None,
            complete: cells.is_empty(),
        };
        let state = Cursor {
            cells: cells.into(),
            index: 0,
        };
        (state, carve)
    }

    pub(super) fn step(&mut self, grid: &mut Rc<Grid>, rng: &mut StdRng) -> Carve {
        let Some(&(x, y)) = self.cells.get(self.index) else {
            return Carve {
                current: None,
                complete: true,
            };
        };

        let mut options = Vec::with_capacity(2);
        if y > 1 {
            options.push((x, y - 1));
        }
        if x < grid.size() - 2 {
            options.push((x + 1, y));
        }
        // Only the top-right room has nowhere to go
        if !options.is_empty() {
            let connector = options[rng.random_range(0..options.len())];
            Rc::make_mut(grid).open(connector);
        }
        self.index += 1;

        Carve {
            current: Some((x, y)),
            complete: self.index >= self.cells.len(),
        }
    }

    pub(super) fn processed(&self) -> usize {
        self.index
    }

    pub(super) fn total(&self) -> usize {
        self.cells.len()
    }

    pub(super) fn done(&self) -> &[Coord] {
        &self.cells[..self.index.min(self.cells.len())]
    }

    pub(super) fn remaining(&self) -> &[Coord] {
        &self.cells[self.index.min(self.cells.len())..]
    }
}
