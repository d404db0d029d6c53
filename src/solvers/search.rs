use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap, HashSet, VecDeque},
};

use crate::maze::{Coord, Grid, manhattan, open_neighbors};

/// Entry of the A* open set. Ordered by estimated total cost, then by the
/// remaining estimate so ties favour cells closer to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    estimate: usize,
    remaining: usize,
    coord: Coord,
}

#[derive(Debug, Clone)]
enum Frontier {
    /// First in, first out
    Queue(VecDeque<Coord>),
    /// Last in, first out
    Stack(Vec<Coord>),
    /// Using Reverse to turn the max-heap into a min-heap
    Open(BinaryHeap<Reverse<OpenNode>>),
}

/// Result of one search step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Expansion {
    /// A cell was taken from the frontier and its neighbors recorded.
    Expanded(Coord),
    /// The goal was taken from the frontier; carries the start-to-goal path.
    Found(Vec<Coord>),
    /// Nothing left to take.
    Exhausted,
}

/// Full-knowledge search shared by BFS, DFS and A*.
#[derive(Debug, Clone)]
pub(super) struct Search {
    frontier: Frontier,
    /// Discovered cells for BFS and DFS, closed cells for A*
    visited: HashSet<Coord>,
    parent: HashMap<Coord, Coord>,
    /// Hash map to track the minimum cost to reach each cell (A* only)
    cost: HashMap<Coord, usize>,
}

impl Search {
    pub(super) fn bfs(start: Coord) -> Self {
        Search {
            frontier: Frontier::Queue(VecDeque::from([start])),
            visited: HashSet::from([start]),
            parent: HashMap::new(),
            cost: HashMap::new(),
        }
    }

    pub(super) fn dfs(start: Coord) -> Self {
        Search {
            frontier: Frontier::Stack(vec![start]),
            visited: HashSet::from([start]),
            parent: HashMap::new(),
            cost: HashMap::new(),
        }
    }

    pub(super) fn astar(start: Coord, goal: Coord) -> Self {
        let remaining = manhattan(start, goal);
        Search {
            frontier: Frontier::Open(BinaryHeap::from([Reverse(OpenNode {
                estimate: remaining,
                remaining,
                coord: start,
            })])),
            visited: HashSet::new(),
            parent: HashMap::new(),
            cost: HashMap::from([(start, 0)]),
        }
    }

    /// Takes one cell off the frontier and expands it.
    pub(super) fn step(&mut self, grid: &Grid, goal: Coord) -> Expansion {
        let Some(current) = self.pop() else {
            return Expansion::Exhausted;
        };
        if current == goal {
            return Expansion::Found(self.reconstruct(goal));
        }

        let neighbors = open_neighbors(grid, current)
            .map(|(_, c)| c)
            .collect::<Vec<_>>();
        match &mut self.frontier {
            Frontier::Queue(queue) => {
                for next in neighbors {
                    if self.visited.insert(next) {
                        self.parent.insert(next, current);
                        queue.push_back(next);
                    }
                }
            }
            Frontier::Stack(stack) => {
                for next in neighbors {
                    if self.visited.insert(next) {
                        self.parent.insert(next, current);
                        stack.push(next);
                    }
                }
            }
            Frontier::Open(open) => {
                // Uniform cost for each step
                let new_cost = self.cost.get(&current).copied().unwrap_or(0) + 1;
                for next in neighbors {
                    if self.visited.contains(&next) {
                        continue;
                    }
                    // Only consider neighbors that we can reach with a lower cost
                    let is_cheaper = self
                        .cost
                        .get(&next)
                        .is_none_or(|&existing| new_cost < existing);
                    if is_cheaper {
                        let remaining = manhattan(next, goal);
                        self.cost.insert(next, new_cost);
                        self.parent.insert(next, current);
                        open.push(Reverse(OpenNode {
                            estimate: new_cost + remaining,
                            remaining,
                            coord: next,
                        }));
                    }
                }
            }
        }
        Expansion::Expanded(current)
    }

    /// Next cell to expand. A* skips entries for cells that were already closed.
    fn pop(&mut self) -> Option<Coord> {
        match &mut self.frontier {
            Frontier::Queue(queue) => queue.pop_front(),
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Open(open) => {
                while let Some(Reverse(node)) = open.pop() {
                    if self.visited.insert(node.coord) {
                        return Some(node.coord);
                    }
                }
                None
            }
        }
    }

    /// Backtrack from the goal through the parent links.
    fn reconstruct(&self, goal: Coord) -> Vec<Coord> {
        let mut path = vec![goal];
        let mut node = goal;
        while let Some(&parent) = self.parent.get(&node) {
            path.push(parent);
            node = parent;
        }
        path.reverse();
        path
    }

    pub(super) fn is_frontier_empty(&self) -> bool {
        match &self.frontier {
            Frontier::Queue(queue) => queue.is_empty(),
            Frontier::Stack(stack) => stack.is_empty(),
            Frontier::Open(open) => open.iter().all(|Reverse(node)| self.visited.contains(&node.coord)),
        }
    }

    pub(super) fn frontier(&self) -> Vec<Coord> {
        match &self.frontier {
            Frontier::Queue(queue) => queue.iter().copied().collect(),
            Frontier::Stack(stack) => stack.clone(),
            Frontier::Open(open) => open
                .iter()
                .map(|Reverse(node)| node.coord)
                .filter(|c| !self.visited.contains(c))
                .collect(),
        }
    }

    pub(super) fn visited(&self) -> impl Iterator<Item = &Coord> {
        self.visited.iter()
    }

    pub(super) fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> Grid {
        let rows = ["#######", "#.....#", "#.....#", "#.....#", "#.....#", "#.....#", "#######"];
        Grid::from_rows(&rows).unwrap()
    }

    fn run(mut search: Search, grid: &Grid, goal: Coord) -> Option<Vec<Coord>> {
        loop {
            match search.step(grid, goal) {
                Expansion::Expanded(_) => {}
                Expansion::Found(path) => return Some(path),
                Expansion::Exhausted => return None,
            }
        }
    }

    #[test]
    fn test_bfs_and_astar_are_optimal_in_open_room() {
        let grid = open_room();
        let (start, goal) = ((1, 1), (5, 5));
        let bfs = run(Search::bfs(start), &grid, goal).unwrap();
        let astar = run(Search::astar(start, goal), &grid, goal).unwrap();
        assert_eq!(bfs.len(), 9);
        assert_eq!(astar.len(), 9);
        assert_eq!(bfs.first(), Some(&start));
        assert_eq!(astar.last(), Some(&goal));
    }

    #[test]
    fn test_dfs_path_is_connected() {
        let grid = open_room();
        let (start, goal) = ((1, 1), (5, 5));
        let path = run(Search::dfs(start), &grid, goal).unwrap();
        assert!(path.len() >= 9);
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1);
            assert!(grid.is_open(pair[1]));
        }
    }

    #[test]
    fn test_astar_expands_fewer_cells_than_bfs() {
        let grid = open_room();
        let (start, goal) = ((1, 1), (5, 5));
        let mut bfs = Search::bfs(start);
        let mut astar = Search::astar(start, goal);
        let mut bfs_steps = 0;
        while !matches!(bfs.step(&grid, goal), Expansion::Found(_)) {
            bfs_steps += 1;
        }
        let mut astar_steps = 0;
        while !matches!(astar.step(&grid, goal), Expansion::Found(_)) {
            astar_steps += 1;
        }
        assert!(astar_steps < bfs_steps);
        // On an open room the estimate is exact, so A* walks straight there
        assert_eq!(astar_steps, 8);
    }

    #[test]
    fn test_disconnected_goal_exhausts() {
        let rows = ["#####", "#.#.#", "#####", "#...#", "#####"];
        let grid = Grid::from_rows(&rows).unwrap();
        for search in [Search::bfs((1, 1)), Search::dfs((1, 1)), Search::astar((1, 1), (3, 3))] {
            assert_eq!(run(search, &grid, (3, 3)), None);
        }
    }
}
