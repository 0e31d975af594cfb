use rand::Rng;

use super::board::Board;
use super::cascade::{find_and_do_combos, merge, BoardStep};
use super::gravity::move_tiles_down;
use super::matcher::{detect_match, resolve_overlaps};
use super::tile::Position;
use crate::error::Result;

pub(crate) fn is_adjacent(a: &Position, b: &Position) -> bool {
    a.is_adjacent(b)
}

/// A swap is valid if the tiles are neighbours and the swapped board has a match through
/// either of them.
pub(crate) fn is_move_valid(from: &Position, to: &Position, swapped: &Board) -> bool {
    is_adjacent(from, to)
        && (detect_match(from, swapped).is_some() || detect_match(to, swapped).is_some())
}

/// Swap two tiles and play out the consequences, returning every intermediate board.
///
/// An invalid swap yields the swapped board followed by the original one so the caller can
/// animate the tiles snapping back. A valid swap yields the swapped board, the merge of the
/// swapped tiles, the merged tiles marked as removed, the compacted and refilled board, and
/// then every combo step until the board is at rest.
pub(crate) fn swap_tile<R: Rng>(
    rng: &mut R,
    from: &Position,
    to: &Position,
    board: &Board,
) -> Result<Vec<BoardStep>> {
    board.check(from)?;
    board.check(to)?;

    let swapped = board.swapped(from, to);
    if !is_move_valid(from, to, &swapped) {
        log::debug!("swap {} <-> {} is not a valid move", from, to);
        return Ok(vec![
            BoardStep::new(swapped, 0),
            BoardStep::new(board.clone(), 0),
        ]);
    }

    let matches = resolve_overlaps(
        [from, to]
            .iter()
            .filter_map(|p| detect_match(p, &swapped))
            .collect(),
    );
    for m in &matches {
        log::debug!("swap {} <-> {} merged {}", from, to, m);
    }
    let (merged, points) = merge(&matches, &swapped);
    let (marked, compacted) = move_tiles_down(rng, &matches, &merged);

    let mut steps = vec![
        BoardStep::new(swapped, 0),
        BoardStep::new(merged, points),
        BoardStep::new(marked, 0),
        BoardStep::new(compacted.clone(), 0),
    ];
    steps.extend(find_and_do_combos(rng, &compacted)?);
    Ok(steps)
}
