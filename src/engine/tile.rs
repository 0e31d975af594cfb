use rand::Rng;

use crate::tui::geometry::Direction;

/// Position is the (x, y) coordinate of a board cell; x is the column, y the row counted from
/// the top.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Position(pub(crate) usize, pub(crate) usize);

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pos({0},{1})", self.0, self.1)
    }
}

impl Position {
    pub(crate) fn x(&self) -> usize {
        self.0
    }

    pub(crate) fn y(&self) -> usize {
        self.1
    }

    pub(crate) fn step(&self, direction: &Direction, size: usize) -> Option<Position> {
        let (x, y) = (self.0, self.1);
        match direction {
            Direction::Up if y > 0 => Some(Position(x, y - 1)),
            Direction::Down if y + 1 < size => Some(Position(x, y + 1)),
            Direction::Left if x > 0 => Some(Position(x - 1, y)),
            Direction::Right if x + 1 < size => Some(Position(x + 1, y)),
            _ => None,
        }
    }

    /// The in-bounds neighbours of this position on a board of the given size, in up, down,
    /// left, right order.
    pub(crate) fn neighbours(&self, size: usize) -> Vec<Position> {
        Direction::ALL
            .iter()
            .filter_map(|d| self.step(d, size))
            .collect()
    }

    pub(crate) fn is_adjacent(&self, other: &Position) -> bool {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1) == 1
    }
}

pub(crate) type TileId = u64;

/// Value is the exponent of a tile; the number shown to the player is `2^value`.
pub(crate) type Value = u32;

pub(crate) const MIN_NEW_VALUE: Value = 1;
pub(crate) const MAX_NEW_VALUE: Value = 4;

/// Tile is a single cell of the board. A removed tile stays in place for exactly one step so
/// the caller can animate it sliding into the tile it merged into; it never matches anything.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tile {
    Live {
        id: TileId,
        value: Value,
    },
    Removed {
        id: TileId,
        value: Value,
        merged_to: Position,
    },
}

impl Tile {
    pub(crate) fn new(id: TileId, value: Value) -> Self {
        Tile::Live { id, value }
    }

    pub(crate) fn random<R: Rng>(rng: &mut R) -> Self {
        let id = rng.gen();
        Tile::Live {
            id,
            value: random_value(rng),
        }
    }

    pub(crate) fn id(&self) -> TileId {
        match self {
            Tile::Live { id, .. } | Tile::Removed { id, .. } => *id,
        }
    }

    pub(crate) fn value(&self) -> Value {
        match self {
            Tile::Live { value, .. } | Tile::Removed { value, .. } => *value,
        }
    }

    /// The value of the tile if it can still take part in a match.
    pub(crate) fn live_value(&self) -> Option<Value> {
        match self {
            Tile::Live { value, .. } => Some(*value),
            Tile::Removed { .. } => None,
        }
    }

    pub(crate) fn is_removed(&self) -> bool {
        matches!(self, Tile::Removed { .. })
    }

    pub(crate) fn merged_to(&self) -> Option<Position> {
        match self {
            Tile::Live { .. } => None,
            Tile::Removed { merged_to, .. } => Some(*merged_to),
        }
    }

    pub(crate) fn displayed(&self) -> u64 {
        displayed(self.value())
    }

    pub(crate) fn with_value(&self, value: Value) -> Self {
        match self {
            Tile::Live { id, .. } => Tile::Live { id: *id, value },
            Tile::Removed { id, merged_to, .. } => Tile::Removed {
                id: *id,
                value,
                merged_to: *merged_to,
            },
        }
    }

    pub(crate) fn remove(&self, merged_to: Position) -> Self {
        Tile::Removed {
            id: self.id(),
            value: self.value(),
            merged_to,
        }
    }
}

pub(crate) fn random_value<R: Rng>(rng: &mut R) -> Value {
    rng.gen_range(MIN_NEW_VALUE..=MAX_NEW_VALUE)
}

/// `2^value`, saturating at `u64::MAX`.
pub(crate) fn displayed(value: Value) -> u64 {
    2u64.checked_pow(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::corner(Position(0, 0), 3, vec![Position(0, 1), Position(1, 0)])]
    #[case::center(
        Position(1, 1),
        3,
        vec![Position(1, 0), Position(1, 2), Position(0, 1), Position(2, 1)],
    )]
    #[case::bottom_right(Position(2, 2), 3, vec![Position(2, 1), Position(1, 2)])]
    #[case::single(Position(0, 0), 1, vec![])]
    fn neighbours(#[case] pos: Position, #[case] size: usize, #[case] expected: Vec<Position>) {
        assert_eq!(pos.neighbours(size), expected);
    }

    #[rstest]
    #[case::one(1, 2)]
    #[case::eleven(11, 2048)]
    #[case::sixty_three(63, 1 << 63)]
    #[case::saturates(64, u64::MAX)]
    fn displayed_value(#[case] value: Value, #[case] expected: u64) {
        assert_eq!(displayed(value), expected);
    }

    #[rstest]
    #[case::right(Position(1, 1), Position(2, 1), true)]
    #[case::above(Position(1, 1), Position(1, 0), true)]
    #[case::same(Position(1, 1), Position(1, 1), false)]
    #[case::diagonal(Position(1, 1), Position(2, 2), false)]
    #[case::two_apart(Position(0, 1), Position(2, 1), false)]
    fn adjacency(#[case] a: Position, #[case] b: Position, #[case] expected: bool) {
        assert_eq!(a.is_adjacent(&b), expected);
        assert_eq!(b.is_adjacent(&a), expected);
    }

    #[test]
    fn random_tiles_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..1000 {
            let tile = Tile::random(&mut rng);
            assert!((MIN_NEW_VALUE..=MAX_NEW_VALUE).contains(&tile.value()));
            assert!(!tile.is_removed());
        }
    }

    #[test]
    fn remove_keeps_identity() {
        let tile = Tile::new(7, 3);
        let removed = tile.remove(Position(1, 2));
        assert!(removed.is_removed());
        assert_eq!(removed.id(), 7);
        assert_eq!(removed.value(), 3);
        assert_eq!(removed.live_value(), None);
        assert_eq!(removed.merged_to(), Some(Position(1, 2)));
        assert_eq!(tile.with_value(5), Tile::new(7, 5));
    }
}
