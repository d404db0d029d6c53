use std::fmt;

use crossterm::style::{Color, Stylize};

use crate::{
    maze::{Coord, Grid},
    stepping::Stepper,
};

/// What a single grid cell looks like on screen, overlays included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Passage,
    /// Settled by the algorithm
    Visited,
    /// Candidate for a later step
    Frontier,
    /// Part of the reconstructed path or robot trail
    Path,
    Current,
    Start,
    Goal,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Wall => "⬜".with(Color::White),
            Tile::Passage => "  ".with(Color::Reset),
            Tile::Visited => "* ".with(Color::Blue),
            Tile::Frontier => "🟪".with(Color::Magenta),
            Tile::Path => "🟨".with(Color::Yellow),
            Tile::Current => "🟡".with(Color::Yellow),
            Tile::Start => "🟩".with(Color::Green),
            Tile::Goal => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::CELL_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Row-major tiles for a state. Later layers win: grid, visited, frontier,
/// path, endpoints, current cell.
pub fn compose<S: Stepper>(state: &S, endpoints: Option<(Coord, Coord)>) -> Vec<Tile> {
    let grid = state.grid();
    let size = grid.size() as usize;
    let mut tiles = grid
        .coords()
        .map(|c| if grid.is_open(c) { Tile::Passage } else { Tile::Wall })
        .collect::<Vec<_>>();

    let mut paint = |coord: Coord, tile: Tile| {
        if let Some(index) = tile_index(grid, size, coord) {
            tiles[index] = tile;
        }
    };
    for coord in state.visited() {
        paint(coord, Tile::Visited);
    }
    for coord in state.frontier() {
        paint(coord, Tile::Frontier);
    }
    for &coord in state.path() {
        paint(coord, Tile::Path);
    }
    if let Some((start, goal)) = endpoints {
        paint(start, Tile::Start);
        paint(goal, Tile::Goal);
    }
    if let Some(coord) = state.current() {
        paint(coord, Tile::Current);
    }
    tiles
}

fn tile_index(grid: &Grid, size: usize, (x, y): Coord) -> Option<usize> {
    grid.in_bounds((x, y))
        .then(|| y as usize * size + x as usize)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::solvers::{Solve, Solver};

    #[test]
    fn test_every_tile_is_two_columns() {
        use unicode_width::UnicodeWidthStr;
        for tile in [
            Tile::Wall,
            Tile::Passage,
            Tile::Visited,
            Tile::Frontier,
            Tile::Path,
            Tile::Current,
            Tile::Start,
            Tile::Goal,
        ] {
            // Rendering also runs the debug width check
            let rendered = tile.to_string();
            assert!(!rendered.is_empty());
            assert!(rendered.width() >= Tile::CELL_WIDTH as usize);
        }
    }

    #[test]
    fn test_compose_layers() {
        let grid = Rc::new(Grid::from_rows(&["#####", "#...#", "#####", "#####", "#####"]).unwrap());
        let state = Solve::new(Solver::Bfs, grid, (1, 1), (3, 1), None).unwrap().step();
        let tiles = compose(&state, Some((state.start(), state.goal())));
        assert_eq!(tiles.len(), 25);
        assert_eq!(tiles[0], Tile::Wall);
        assert_eq!(tiles[5 + 1], Tile::Current);
        assert_eq!(tiles[5 + 2], Tile::Frontier);
        assert_eq!(tiles[5 + 3], Tile::Goal);
    }
}
