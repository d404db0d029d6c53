use crate::error::{LabError, Result};

use super::{Coord, cell::Cell};

/// Square matrix of cells with an odd side length.
///
/// Cells with both coordinates odd are rooms, the remaining cells are
/// connectors or pillars. Coordinates are `(x, y)` with `y` growing downwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Cell]>,
    size: u16,
}

impl Grid {
    /// Smallest side length that still has more than one room.
    pub const MIN_SIZE: u16 = 5;
    /// Largest side length, so every coordinate fits in a byte.
    pub const MAX_SIZE: u16 = 255;

    /// Creates a grid of walls with the given side length.
    pub fn new(size: u16) -> Result<Self> {
        Self::validate_size(size)?;
        let data = vec![Cell::Wall; size as usize * size as usize].into_boxed_slice();
        Ok(Grid { data, size })
    }

    /// Builds a grid from text rows (`#` wall, `.` or space passage).
    /// Rows must form an odd square.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let size = u16::try_from(rows.len()).map_err(|_| LabError::InvalidSize(u16::MAX))?;
        let mut grid = Grid::new(size)?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != size as usize {
                return Err(LabError::InvalidSize(size));
            }
            for (x, c) in row.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or(LabError::InvalidCell(c))?;
                grid.set((x as u16, y as u16), cell);
            }
        }
        Ok(grid)
    }

    pub fn validate_size(size: u16) -> Result<()> {
        if !(Self::MIN_SIZE..=Self::MAX_SIZE).contains(&size) || size % 2 == 0 {
            return Err(LabError::InvalidSize(size));
        }
        Ok(())
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    /// Total number of cells, rooms and walls alike.
    pub fn cell_count(&self) -> usize {
        self.data.len()
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.size && coord.1 < self.size
    }

    pub fn is_boundary(&self, coord: Coord) -> bool {
        coord.0 == 0 || coord.1 == 0 || coord.0 == self.size - 1 || coord.1 == self.size - 1
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since size is u16 (assuming usize is at least 32 bits)
        y as usize * self.size as usize + x as usize
    }

    /// Returns the cell at `coord`, or `None` when it is out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.in_bounds(coord)
            .then(|| self.data[self.ravel_index(coord.0, coord.1)])
    }

    /// Out-of-bounds coordinates read as walls.
    pub fn is_open(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_open)
    }

    /// Writes a cell. Writes outside the grid are ignored.
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        if !self.in_bounds(coord) {
            tracing::trace!("[grid] ignoring write outside the grid at {:?}", coord);
            return;
        }
        let idx = self.ravel_index(coord.0, coord.1);
        self.data[idx] = cell;
    }

    pub fn open(&mut self, coord: Coord) {
        self.set(coord, Cell::Passage);
    }

    /// Iterates over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| (x, y)))
    }

    /// Text form of the grid, one row per line.
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.size)
            .map(|y| (0..self.size).map(|x| self[(x, y)].as_char()).collect())
            .collect()
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}
