use rand::Rng;

use super::board::Board;
use super::gravity::move_tiles_down;
use super::matcher::{unique_matches, Match, Score};
use crate::error::{Error, Result};

/// Safety net for combo chains; no real board gets anywhere near this.
pub(crate) const MAX_CASCADE_ITERATIONS: usize = 100;

/// BoardStep is one frame of the sequence produced by a move along with the points that frame
/// earned.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BoardStep {
    pub(crate) board: Board,
    pub(crate) points: Score,
}

impl BoardStep {
    pub(crate) fn new(board: Board, points: Score) -> Self {
        Self { board, points }
    }
}

pub(crate) fn total_points(steps: &[BoardStep]) -> Score {
    steps
        .iter()
        .fold(0, |total: Score, s| total.saturating_add(s.points))
}

/// A copy of the board with each match's origin set to its merged value, along with the
/// points those merges are worth.
pub(crate) fn merge(matches: &[Match], board: &Board) -> (Board, Score) {
    let mut merged = board.clone();
    let mut points: Score = 0;
    for m in matches {
        let origin = m.origin();
        let tile = *merged.get(&origin);
        merged.set(&origin, tile.with_value(m.value()));
        points = points.saturating_add(m.points());
    }
    (merged, points)
}

/// Resolve combos until the board is at rest. Every round emits a merge step carrying its
/// points followed by the compacted and refilled board.
pub(crate) fn find_and_do_combos<R: Rng>(rng: &mut R, board: &Board) -> Result<Vec<BoardStep>> {
    resolve_combos(rng, board, MAX_CASCADE_ITERATIONS)
}

fn resolve_combos<R: Rng>(rng: &mut R, board: &Board, limit: usize) -> Result<Vec<BoardStep>> {
    let mut steps = Vec::new();
    let mut board = board.clone();
    for depth in 0..=limit {
        let matches = unique_matches(&board);
        if matches.is_empty() {
            if depth > 0 {
                log::debug!("combo chain of {} resolved", depth);
            }
            return Ok(steps);
        }
        if depth == limit {
            break;
        }
        for m in &matches {
            log::trace!("combo {}: {}", depth, m);
        }
        let (merged, points) = merge(&matches, &board);
        steps.push(BoardStep::new(merged.clone(), points));
        let (_, compacted) = move_tiles_down(rng, &matches, &merged);
        steps.push(BoardStep::new(compacted.clone(), 0));
        board = compacted;
    }
    log::error!(
        "board still unstable after {} combo iterations:\n{}",
        limit,
        board
    );
    Err(Error::CascadeOverflow(limit))
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::matcher::all_matches;
    use crate::engine::rng::ZeroRng;
    use crate::engine::tile::Position;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn stable_board_emits_nothing() {
        let board = Board::random(&mut rng(), 8).unwrap();
        let steps = find_and_do_combos(&mut rng(), &board).unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn resolves_until_stable() {
        let board = Board::from_rows(&[
            vec![1, 2, 3, 3],
            vec![1, 3, 2, 3],
            vec![1, 2, 1, 3],
            vec![2, 1, 2, 1],
        ]);
        let steps = find_and_do_combos(&mut rng(), &board).unwrap();
        assert!(steps.len() >= 2);
        assert_eq!(steps.len() % 2, 0);

        // first round merges both runs at their top tiles
        let first = &steps[0];
        assert_eq!(first.points, 2u64.pow(5) + 2u64.pow(3));
        assert_eq!(first.board.get(&Position(3, 0)).value(), 5);
        assert_eq!(first.board.get(&Position(0, 0)).value(), 3);
        for (idx, step) in steps.iter().enumerate() {
            if idx % 2 == 1 {
                assert_eq!(step.points, 0);
            } else {
                assert!(step.points > 0);
            }
        }
        let last = steps.last().unwrap();
        assert!(all_matches(&last.board).is_empty());
    }

    fn chain_board() -> Board {
        Board::from_rows(&[
            vec![1, 1, 1, 1],
            vec![2, 3, 2, 3],
            vec![3, 2, 3, 2],
            vec![2, 3, 2, 3],
        ])
    }

    #[test]
    fn refills_chain_into_combos() {
        // every refilled tile is a 1, so the refilled row matches again once
        let steps = find_and_do_combos(&mut ZeroRng, &chain_board()).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].points, 16);
        assert_eq!(steps[0].board.values()[..4], [4, 1, 1, 1]);
        assert_eq!(steps[1].board.values()[..4], [4, 1, 1, 1]);
        assert_eq!(steps[2].points, 8);
        assert_eq!(steps[3].points, 0);
        assert_eq!(steps[3].board.values()[..4], [4, 3, 1, 1]);
        assert_eq!(total_points(&steps), 24);
    }

    #[test]
    fn exceeding_the_limit_is_an_error() {
        assert!(matches!(
            resolve_combos(&mut ZeroRng, &chain_board(), 1),
            Err(Error::CascadeOverflow(1))
        ));
        assert!(matches!(
            resolve_combos(&mut ZeroRng, &chain_board(), 0),
            Err(Error::CascadeOverflow(0))
        ));
        assert_eq!(resolve_combos(&mut ZeroRng, &chain_board(), 2).unwrap().len(), 4);
    }

    #[test]
    fn merge_sums_points() {
        let board = Board::from_rows(&[
            vec![1, 2, 3, 3],
            vec![1, 3, 2, 3],
            vec![1, 2, 1, 3],
            vec![2, 1, 2, 1],
        ]);
        let matches = unique_matches(&board);
        let (merged, points) = merge(&matches, &board);
        assert_eq!(points, 40);
        assert_eq!(total_points(&[BoardStep::new(merged, points), BoardStep::new(board, 0)]), 40);
    }
}
