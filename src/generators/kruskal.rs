use std::rc::Rc;

use rand::{rngs::StdRng, seq::SliceRandom};

use super::{Carve, UnionFind};
use crate::maze::{Coord, Grid};

/// Wall edge between two adjacent rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Edge {
    room1: usize,
    room2: usize,
    connector: Coord,
}

/// Shuffled edges processed one per step against a union-find of rooms.
#[derive(Debug, Clone)]
pub(super) struct EdgeQueue {
    /// Shuffled once at init and never modified afterwards
    edges: Rc<[Edge]>,
    processed: usize,
    sets: UnionFind,
}

impl EdgeQueue {
    pub(super) fn init(grid: &mut Grid, rng: &mut StdRng) -> (Self, Carve) {
        let size = grid.size();
        let per_side = (size as usize - 1) / 2;
        // Convert room coordinates to union-find indices
        let index = |(x, y): Coord| (y as usize / 2) * per_side + x as usize / 2;

        let rooms = grid.room_cells();
        for &room in &rooms {
            grid.open(room);
        }

        let mut edges = rooms
            .iter()
            .flat_map(|&(x, y)| {
                [
                    (x + 2 < size - 1).then(|| Edge {
                        room1: index((x, y)),
                        room2: index((x + 2, y)),
                        connector: (x + 1, y),
                    }),
                    (y + 2 < size - 1).then(|| Edge {
                        room1: index((x, y)),
                        room2: index((x, y + 2)),
                        connector: (x, y + 1),
                    }),
                ]
            })
            .flatten()
            .collect::<Vec<_>>();

        // Shuffle edges randomly
        edges.shuffle(rng);

        let state = EdgeQueue {
            sets: UnionFind::new(rooms.len()),
            edges: edges.into(),
            processed: 0,
        };
        let carve = Carve {
            current: None,
            complete: state.edges.is_empty(),
        };
        (state, carve)
    }

    pub(super) fn step(&mut self, grid: &mut Rc<Grid>) -> Carve {
        let Some(&edge) = self.edges.get(self.processed) else {
            return Carve {
                current: None,
                complete: true,
            };
        };

        // If rooms are not yet connected, remove the wall between them.
        // Otherwise the edge would close a cycle and is skipped.
        if self.sets.union(edge.room1, edge.room2) {
            Rc::make_mut(grid).open(edge.connector);
        }
        self.processed += 1;

        Carve {
            current: Some(edge.connector),
            complete: self.processed >= self.edges.len(),
        }
    }

    pub(super) fn processed(&self) -> usize {
        self.processed
    }

    pub(super) fn total(&self) -> usize {
        self.edges.len()
    }

    pub(super) fn pending_connectors(&self) -> Vec<Coord> {
        self.edges[self.processed.min(self.edges.len())..]
            .iter()
            .map(|edge| edge.connector)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_edges_cover_every_adjacent_pair() {
        let mut grid = Grid::new(9).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let (state, carve) = EdgeQueue::init(&mut grid, &mut rng);
        // 4x4 rooms: 3 horizontal edges per row and 3 vertical per column
        assert_eq!(state.total(), 24);
        assert!(!carve.complete);
        assert!(grid.room_cells().iter().all(|&room| grid.is_open(room)));
        assert!(state.edges.iter().all(|edge| !grid.is_open(edge.connector)));
    }

    #[test]
    fn test_cycle_edges_are_skipped() {
        let mut grid = Grid::new(9).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let (mut state, _) = EdgeQueue::init(&mut grid, &mut rng);
        let mut grid = Rc::new(grid);
        while !state.step(&mut grid).complete {}
        assert_eq!(state.sets.set_count(), 1);
        assert_eq!(grid.open_connector_count(), grid.room_count() - 1);
        assert_eq!(state.pending_connectors(), Vec::<Coord>::new());
    }
}
