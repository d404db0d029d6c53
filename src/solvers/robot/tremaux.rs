use rand::{Rng, rngs::StdRng};

use super::Senses;
use crate::maze::{Coord, Direction, open_neighbors};

/// Marks cells as it walks and prefers the least-marked way out.
#[derive(Clone)]
pub(crate) struct Tremaux {
    rng: StdRng,
}

impl Tremaux {
    pub(crate) fn new(rng: StdRng) -> Self {
        Tremaux { rng }
    }

    pub(super) fn choose(&mut self, senses: &Senses) -> Option<(Direction, Coord)> {
        let options = open_neighbors(senses.grid, senses.current)
            .map(|(dir, next)| (dir, next, senses.visits(next)))
            .collect::<Vec<_>>();
        if options.is_empty() {
            return None;
        }

        // Fresh cells first, picked at random
        let fresh = options
            .iter()
            .filter(|&&(_, _, count)| count == 0)
            .collect::<Vec<_>>();
        if !fresh.is_empty() {
            let (dir, next, _) = *fresh[self.rng.random_range(0..fresh.len())];
            return Some((dir, next));
        }

        // Then a passage marked once that we did not just come from
        if let Some(&(dir, next, _)) = options
            .iter()
            .find(|&&(_, next, count)| count == 1 && Some(next) != senses.previous)
        {
            return Some((dir, next));
        }

        // Otherwise the least-marked neighbor, first in clockwise order on ties
        options
            .iter()
            .min_by_key(|&&(_, _, count)| count)
            .map(|&(dir, next, _)| (dir, next))
    }
}
