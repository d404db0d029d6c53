/// A single square of the grid. Every algorithm in the crate only ever sees
/// these two states; overlays such as visited sets live in algorithm state.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Wall,
    Passage,
}

impl Cell {
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Passage)
    }

    /// Parse a cell from its text form: `#` is a wall, `.` or a space is a passage.
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '#' => Some(Cell::Wall),
            '.' | ' ' => Some(Cell::Passage),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Passage => '.',
        }
    }
}
