use crate::engine::tile::Position;

/// Direction represents the direction indicated by the player, or a direction to scan across
/// the board.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Direction {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Every direction in up, down, left, right order.
    pub(crate) const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        };
        write!(f, "{}", s)
    }
}

/// Cursor tracks the tile the player is pointing at. It stops at the board edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Cursor {
    position: Position,
    size: usize,
}

impl Cursor {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            position: Position(0, 0),
            size,
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn translate(&mut self, dir: &Direction) {
        if let Some(p) = self.position.step(dir, self.size) {
            self.position = p;
        }
    }
}
