use super::board::Board;
use super::matcher::detect_match;
use super::tile::Position;

/// Find the first pair of neighbouring tiles, scanning in row-major order, whose swap would
/// produce a match.
pub(crate) fn almost_matching_pair(board: &Board) -> Option<(Position, Position)> {
    for pos in board.positions() {
        for neighbour in pos.neighbours(board.size()) {
            let swapped = board.swapped(&pos, &neighbour);
            if detect_match(&pos, &swapped).is_some()
                || detect_match(&neighbour, &swapped).is_some()
            {
                return Some((pos, neighbour));
            }
        }
    }
    None
}

pub(crate) fn is_game_over(board: &Board) -> bool {
    almost_matching_pair(board).is_none()
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rstest::*;

    use super::*;
    use crate::engine::swap::is_move_valid;
    use crate::engine::tile::Value;

    #[rstest]
    #[case::first_found_wins(
        // swapping (0, 2) and (1, 2) would also work but comes later in the scan
        vec![vec![1, 2, 3], vec![1, 3, 2], vec![2, 1, 3]],
        Some((Position(1, 1), Position(2, 1))),
    )]
    #[case::row_gap(
        vec![vec![4, 1, 4], vec![1, 4, 2], vec![3, 2, 3]],
        Some((Position(1, 0), Position(1, 1))),
    )]
    #[case::checkerboard(
        vec![vec![1, 2, 1], vec![3, 4, 3], vec![1, 2, 1]],
        None,
    )]
    fn first_pair(
        #[case] rows: Vec<Vec<Value>>,
        #[case] expected: Option<(Position, Position)>,
    ) {
        let board = Board::from_rows(&rows);
        assert_eq!(almost_matching_pair(&board), expected);
        assert_eq!(is_game_over(&board), expected.is_none());
    }

    #[test]
    fn game_over_iff_no_valid_swap() {
        let mut rng = SmallRng::seed_from_u64(42);
        for size in [3, 4, 5] {
            for _ in 0..50 {
                let board = Board::random(&mut rng, size).unwrap();
                let any_valid = board.positions().any(|p| {
                    p.neighbours(size)
                        .iter()
                        .any(|q| is_move_valid(&p, q, &board.swapped(&p, q)))
                });
                assert_eq!(is_game_over(&board), !any_valid, "\n{}", board);
                if let Some((a, b)) = almost_matching_pair(&board) {
                    assert!(is_move_valid(&a, &b, &board.swapped(&a, &b)));
                }
            }
        }
    }
}
