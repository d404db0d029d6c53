pub mod cell;
mod grid;

use std::collections::{HashSet, VecDeque};

use rand::Rng;

pub use cell::Cell;
pub use grid::Grid;

/// `(x, y)` position in a grid.
pub type Coord = (u16, u16);

/// Cardinal directions, in clockwise order starting from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    fn from_index(index: usize) -> Direction {
        Direction::ALL[index % 4]
    }

    /// Quarter turn clockwise.
    pub fn right(self) -> Direction {
        Direction::from_index(self.index() + 1)
    }

    /// Quarter turn counter-clockwise.
    pub fn left(self) -> Direction {
        Direction::from_index(self.index() + 3)
    }

    pub fn reverse(self) -> Direction {
        Direction::from_index(self.index() + 2)
    }

    /// Signed clockwise angle in degrees needed to turn from `self` to `to`.
    /// A reversal counts as a clockwise half turn.
    pub fn turn_angle(self, to: Direction) -> i32 {
        match (to.index() + 4 - self.index()) % 4 {
            0 => 0,
            1 => 90,
            2 => 180,
            _ => -90,
        }
    }

    /// Moves `coord` by `distance` cells. Returns `None` on underflow; the
    /// caller is responsible for the upper bound.
    pub fn offset(self, coord: Coord, distance: u16) -> Option<Coord> {
        let (x, y) = coord;
        match self {
            Direction::North => y.checked_sub(distance).map(|y| (x, y)),
            Direction::East => x.checked_add(distance).map(|x| (x, y)),
            Direction::South => y.checked_add(distance).map(|y| (x, y)),
            Direction::West => x.checked_sub(distance).map(|x| (x, y)),
        }
    }
}

/// Cell halfway between two room cells that are two apart.
pub fn connector_between(a: Coord, b: Coord) -> Coord {
    (a.0.min(b.0) + a.0.abs_diff(b.0) / 2, a.1.min(b.1) + a.1.abs_diff(b.1) / 2)
}

pub fn manhattan(a: Coord, b: Coord) -> usize {
    a.0.abs_diff(b.0) as usize + a.1.abs_diff(b.1) as usize
}

/// Get the room neighbors of a room cell.
/// A room neighbor is two steps away in a cardinal direction and strictly inside
/// the boundary walls. Yields `(room, connector)` pairs in clockwise order from north.
pub fn room_neighbors(grid: &Grid, coord: Coord) -> impl Iterator<Item = (Coord, Coord)> + '_ {
    Direction::ALL.into_iter().filter_map(move |dir| {
        let room = dir.offset(coord, 2)?;
        let connector = dir.offset(coord, 1)?;
        (grid.in_bounds(room) && !grid.is_boundary(room)).then_some((room, connector))
    })
}

/// Get the open orthogonal neighbors of a cell, in clockwise order from north.
/// Anything outside the grid reads as a wall.
pub fn open_neighbors(grid: &Grid, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
    Direction::ALL.into_iter().filter_map(move |dir| {
        let next = dir.offset(coord, 1)?;
        grid.is_open(next).then_some((dir, next))
    })
}

impl Grid {
    /// Conventional start cell: the top-left room.
    pub fn default_start(&self) -> Coord {
        (1, 1)
    }

    /// Conventional goal cell: the bottom-right room.
    pub fn default_goal(&self) -> Coord {
        (self.size() - 2, self.size() - 2)
    }

    pub fn is_room(&self, coord: Coord) -> bool {
        self.in_bounds(coord) && coord.0 % 2 == 1 && coord.1 % 2 == 1
    }

    /// Room cells in row-major order.
    pub fn room_cells(&self) -> Vec<Coord> {
        let size = self.size();
        (1..size - 1)
            .step_by(2)
            .flat_map(|y| (1..size - 1).step_by(2).map(move |x| (x, y)))
            .collect()
    }

    pub fn room_count(&self) -> usize {
        let per_side = (self.size() as usize - 1) / 2;
        per_side * per_side
    }

    /// Number of open cells with exactly one even coordinate.
    pub fn open_connector_count(&self) -> usize {
        self.coords()
            .filter(|&(x, y)| (x % 2 == 0) != (y % 2 == 0) && self.is_open((x, y)))
            .count()
    }

    /// Cells reachable from `from` through open cells.
    pub fn reachable_from(&self, from: Coord) -> HashSet<Coord> {
        let mut seen = HashSet::new();
        if !self.is_open(from) {
            return seen;
        }
        let mut queue = VecDeque::from([from]);
        seen.insert(from);
        while let Some(coord) = queue.pop_front() {
            for (_, next) in open_neighbors(self, coord) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    pub fn is_connected(&self, a: Coord, b: Coord) -> bool {
        self.reachable_from(a).contains(&b)
    }

    /// A perfect maze's open cells form a tree: connected, with one fewer
    /// adjacency than open cells.
    pub fn is_perfect(&self) -> bool {
        let open = self.coords().filter(|&c| self.is_open(c)).collect::<Vec<_>>();
        let Some(&first) = open.first() else {
            return false;
        };
        let edges = open
            .iter()
            .map(|&(x, y)| {
                usize::from(self.is_open((x + 1, y))) + usize::from(self.is_open((x, y + 1)))
            })
            .sum::<usize>();
        edges + 1 == open.len() && self.reachable_from(first).len() == open.len()
    }

    /// Opens up to `count` interior walls that touch an open cell both vertically
    /// and horizontally, deliberately creating cycles. Returns how many were opened.
    pub fn punch_loops<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let size = self.size();
        let mut candidates = (2..size - 2)
            .flat_map(|y| (2..size - 2).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                !self.is_open((x, y))
                    && (self.is_open((x, y - 1)) || self.is_open((x, y + 1)))
                    && (self.is_open((x - 1, y)) || self.is_open((x + 1, y)))
            })
            .collect::<Vec<_>>();

        let mut opened = 0;
        while opened < count && !candidates.is_empty() {
            let idx = rng.random_range(0..candidates.len());
            let coord = candidates.swap_remove(idx);
            self.open(coord);
            opened += 1;
        }
        tracing::debug!("[grid] punched {} extra openings", opened);
        opened
    }
}
