use rand::{Rng, rngs::StdRng};

use super::Senses;
use crate::maze::{Coord, Direction, open_neighbors};

/// Moves to a uniformly random open neighbor each step.
#[derive(Clone)]
pub(crate) struct RandomWalk {
    rng: StdRng,
}

impl RandomWalk {
    pub(crate) fn new(rng: StdRng) -> Self {
        RandomWalk { rng }
    }

    pub(super) fn choose(&mut self, senses: &Senses) -> Option<(Direction, Coord)> {
        let options = open_neighbors(senses.grid, senses.current).collect::<Vec<_>>();
        if options.is_empty() {
            return None;
        }
        Some(options[self.rng.random_range(0..options.len())])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::SeedableRng;

    use super::*;
    use crate::maze::Grid;

    #[test]
    fn test_picks_every_open_neighbor_eventually() {
        let grid = Grid::from_rows(&["#####", "##.##", "#...#", "##.##", "#####"]).unwrap();
        let visits = HashMap::new();
        let senses = Senses {
            grid: &grid,
            current: (2, 2),
            goal: (3, 3),
            facing: Direction::East,
            previous: None,
            visits: &visits,
        };
        let mut walk = RandomWalk::new(StdRng::seed_from_u64(42));
        let seen = (0..200)
            .filter_map(|_| walk.choose(&senses))
            .map(|(_, next)| next)
            .collect::<HashSet<_>>();
        assert_eq!(seen, HashSet::from([(2, 1), (3, 2), (2, 3), (1, 2)]));
    }
}
