use std::collections::HashSet;

use super::board::Board;
use super::tile::{displayed, Position, Value};
use crate::tui::geometry::Direction;

/// Score is measured in displayed tile numbers, not exponents.
pub(crate) type Score = u64;

/// Number of equal tiles needed along one axis, besides the origin, for that axis to count.
const MIN_RUN: usize = 2;

/// Match is the outcome of evaluating one position: the runs of equal tiles through it that
/// are long enough to merge, and the value the origin tile merges into.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Match {
    origin: Position,
    tiles: Vec<Position>,
    value: Value,
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Match({0}, {1} tiles, value {2})",
            self.origin,
            self.tiles.len(),
            self.value
        )
    }
}

impl Match {
    pub(crate) fn origin(&self) -> Position {
        self.origin
    }

    /// Every matched position, the origin first.
    pub(crate) fn tiles(&self) -> &[Position] {
        &self.tiles
    }

    pub(crate) fn merged(&self) -> impl Iterator<Item = &Position> {
        self.tiles.iter().filter(move |p| **p != self.origin)
    }

    pub(crate) fn value(&self) -> Value {
        self.value
    }

    pub(crate) fn points(&self) -> Score {
        displayed(self.value)
    }
}

/// Look for runs of at least three equal tiles through `pos`. Vertical and horizontal runs
/// are counted independently so T, L and plus shapes merge every arm that is long enough.
/// Removed tiles never match.
pub(crate) fn detect_match(pos: &Position, board: &Board) -> Option<Match> {
    let value = board.get(pos).live_value()?;
    let mut tiles = vec![*pos];
    for axis in [
        [Direction::Up, Direction::Down],
        [Direction::Left, Direction::Right],
    ] {
        let run: Vec<Position> = axis
            .iter()
            .flat_map(|dir| run(pos, dir, value, board))
            .collect();
        if run.len() >= MIN_RUN {
            tiles.extend(run);
        }
    }
    if tiles.len() == 1 {
        return None;
    }
    let value = value.saturating_add(tiles.len() as Value - 1);
    Some(Match {
        origin: *pos,
        tiles,
        value,
    })
}

/// Every position whose evaluation yields a match, in row-major order.
pub(crate) fn all_matches(board: &Board) -> Vec<Match> {
    board
        .positions()
        .filter_map(|pos| detect_match(&pos, board))
        .collect()
}

pub(crate) fn unique_matches(board: &Board) -> Vec<Match> {
    resolve_overlaps(all_matches(board))
}

/// Walk the matches from highest to lowest resulting value, keeping a match only if none of
/// its tiles were claimed by a match kept before it. Ties keep their original order.
pub(crate) fn resolve_overlaps(mut matches: Vec<Match>) -> Vec<Match> {
    matches.sort_by(|a, b| b.value.cmp(&a.value));
    let mut claimed: HashSet<Position> = HashSet::new();
    let mut unique = Vec::with_capacity(matches.len());
    for m in matches {
        if m.tiles.iter().any(|p| claimed.contains(p)) {
            continue;
        }
        claimed.extend(m.tiles.iter().copied());
        unique.push(m);
    }
    unique
}

// run collects the contiguous live tiles of the given value starting next to `pos`.
fn run(pos: &Position, dir: &Direction, value: Value, board: &Board) -> Vec<Position> {
    let mut v = Vec::new();
    let mut cur = *pos;
    while let Some(next) = cur.step(dir, board.size()) {
        if board.get(&next).live_value() != Some(value) {
            break;
        }
        v.push(next);
        cur = next;
    }
    v
}
