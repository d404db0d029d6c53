use std::collections::HashSet;

use super::Senses;
use crate::maze::{Coord, Direction};

/// Wall follower that heads straight for the goal whenever its accumulated
/// turning angle is back to zero.
///
/// Once heading for the goal has proven to lead in circles, either by
/// breaking out of an orbit or by standing at zero angle on a cell it keeps
/// returning to, the robot only follows the wall. On a cycle-free maze that
/// walks every passage and reaches the goal within one lap.
#[derive(Debug, Clone)]
pub(crate) struct Pledge {
    /// Signed sum of turns while following a wall, in degrees. Clockwise is positive.
    angle: i64,
    loop_turns: u32,
    loop_revisits: u32,
    /// Following the wall only
    hugging: bool,
    /// Positions and headings passed while hugging, since the last break-out
    lap: HashSet<(Coord, Direction)>,
}

/// Dominant axis of the vector from `from` to `to`. Ties go vertical.
fn toward(from: Coord, to: Coord) -> Direction {
    let dx = i32::from(to.0) - i32::from(from.0);
    let dy = i32::from(to.1) - i32::from(from.1);
    if dx.abs() > dy.abs() {
        if dx > 0 { Direction::East } else { Direction::West }
    } else if dy > 0 {
        Direction::South
    } else {
        Direction::North
    }
}

impl Pledge {
    pub(crate) fn new(loop_turns: u32, loop_revisits: u32) -> Self {
        Pledge {
            angle: 0,
            loop_turns,
            loop_revisits,
            hugging: false,
            lap: HashSet::new(),
        }
    }

    pub(crate) fn angle(&self) -> i64 {
        self.angle
    }

    pub(crate) fn is_hugging(&self) -> bool {
        self.hugging
    }

    pub(super) fn choose(&mut self, senses: &Senses) -> Option<(Direction, Coord)> {
        if self.hugging {
            return self.hug(senses);
        }

        let here = senses.visits(senses.current);
        if self.angle == 0 && here > self.loop_revisits {
            // Back at zero on a cell we keep returning to: the goal move oscillates
            self.start_hugging(senses.current);
            return self.hug(senses);
        }

        // Circling an island: many full turns and repeated visits to this cell
        let looping =
            self.angle.abs() >= 360 * i64::from(self.loop_turns) && here > self.loop_revisits;
        if self.angle == 0 || looping {
            let preferred = toward(senses.current, senses.goal);
            if let Some(next) = senses.look(preferred) {
                if looping {
                    tracing::trace!(
                        "[pledge] breaking out of loop at {:?} after {} degrees",
                        senses.current,
                        self.angle
                    );
                    self.angle = 0;
                    self.start_hugging(senses.current);
                }
                return Some((preferred, next));
            }
        }

        self.follow_wall(senses)
    }

    fn start_hugging(&mut self, at: Coord) {
        tracing::trace!("[pledge] following the wall only from {:?}", at);
        self.hugging = true;
        self.lap.clear();
    }

    /// Plain wall following. Passing the same position with the same heading
    /// twice means a whole lap went by without the goal, so try leaving
    /// towards it.
    fn hug(&mut self, senses: &Senses) -> Option<(Direction, Coord)> {
        if !self.lap.insert((senses.current, senses.facing)) {
            let preferred = toward(senses.current, senses.goal);
            if let Some(next) = senses.look(preferred) {
                tracing::trace!("[pledge] lap closed at {:?}, leaving it", senses.current);
                self.angle = 0;
                self.lap.clear();
                return Some((preferred, next));
            }
        }
        self.follow_wall(senses)
    }

    /// Right hand on the wall: right, straight, left, back.
    fn follow_wall(&mut self, senses: &Senses) -> Option<(Direction, Coord)> {
        let facing = senses.facing;
        for dir in [facing.right(), facing, facing.left(), facing.reverse()] {
            if let Some(next) = senses.look(dir) {
                self.angle += i64::from(facing.turn_angle(dir));
                return Some((dir, next));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::maze::Grid;

    #[test]
    fn test_toward() {
        assert_eq!(toward((1, 1), (5, 3)), Direction::East);
        assert_eq!(toward((5, 1), (1, 3)), Direction::West);
        assert_eq!(toward((1, 1), (5, 5)), Direction::South);
        assert_eq!(toward((3, 5), (3, 1)), Direction::North);
    }

    #[test]
    fn test_blocked_robot_turns_right_first() {
        let grid = Grid::from_rows(&["#####", "#...#", "#.#.#", "#...#", "#####"]).unwrap();
        let visits = HashMap::new();
        let senses = Senses {
            grid: &grid,
            current: (1, 3),
            goal: (1, 0),
            facing: Direction::North,
            previous: None,
            visits: &visits,
        };
        let mut pledge = Pledge::new(2, 3);
        let chosen = pledge.choose(&senses);
        // Zero angle and an open cell towards the goal: no wall following
        assert_eq!(chosen, Some((Direction::North, (1, 2))));
        assert_eq!(pledge.angle(), 0);

        // Goal straight north is blocked, the right-hand rule turns east
        let senses = Senses {
            current: (1, 1),
            ..senses
        };
        assert_eq!(pledge.choose(&senses), Some((Direction::East, (2, 1))));
        assert_eq!(pledge.angle(), 90);
    }

    #[test]
    fn test_loop_escape_resets_angle() {
        let grid = Grid::from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]).unwrap();
        let visits = HashMap::from([((2, 2), 4)]);
        let senses = Senses {
            grid: &grid,
            current: (2, 2),
            goal: (3, 3),
            facing: Direction::West,
            previous: None,
            visits: &visits,
        };
        let mut pledge = Pledge::new(2, 3);
        pledge.angle = 720;
        assert_eq!(pledge.choose(&senses), Some((Direction::South, (2, 3))));
        assert_eq!(pledge.angle(), 0);
        assert!(pledge.is_hugging());

        // Not enough revisits: keep following the wall
        let visits = HashMap::from([((2, 2), 2)]);
        let senses = Senses {
            visits: &visits,
            ..senses
        };
        let mut pledge = Pledge::new(2, 3);
        pledge.angle = 720;
        assert_eq!(pledge.choose(&senses), Some((Direction::North, (2, 1))));
        assert_eq!(pledge.angle(), 810);
    }

    #[test]
    fn test_oscillation_falls_back_to_wall_following() {
        let grid = Grid::from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]).unwrap();
        let visits = HashMap::from([((2, 2), 4)]);
        let senses = Senses {
            grid: &grid,
            current: (2, 2),
            goal: (3, 1),
            facing: Direction::East,
            previous: None,
            visits: &visits,
        };
        let mut pledge = Pledge::new(2, 3);
        // Zero angle, but this cell was visited too often to trust the greedy move
        assert_eq!(pledge.choose(&senses), Some((Direction::South, (2, 3))));
        assert_eq!(pledge.angle(), 90);
        assert!(pledge.is_hugging());
    }

    #[test]
    fn test_hugging_leaves_a_closed_lap() {
        let grid = Grid::from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]).unwrap();
        let visits = HashMap::new();
        let senses = Senses {
            grid: &grid,
            current: (2, 2),
            goal: (3, 1),
            facing: Direction::East,
            previous: None,
            visits: &visits,
        };
        let mut pledge = Pledge::new(2, 3);
        pledge.start_hugging((2, 2));
        // First pass keeps the right hand on the wall, even at zero angle
        assert_eq!(pledge.choose(&senses), Some((Direction::South, (2, 3))));
        assert_eq!(pledge.angle(), 90);
        // Same cell and heading again: the lap is closed, head for the goal
        assert_eq!(pledge.choose(&senses), Some((Direction::North, (2, 1))));
        assert_eq!(pledge.angle(), 0);
        assert!(pledge.is_hugging());
    }
}
