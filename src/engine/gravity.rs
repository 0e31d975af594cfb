use rand::Rng;

use super::board::Board;
use super::matcher::Match;
use super::tile::Tile;

/// Remove the tiles merged by `matches` and let the rest fall.
///
/// Returns two boards: the first has every merged tile marked as removed (pointing at the
/// origin it merged into) with the layout unchanged; the second has each column compacted
/// downward with fresh random tiles filling the vacated cells at the top. Refilled tiles are
/// not checked for matches, any they form are resolved by the cascade.
pub(crate) fn move_tiles_down<R: Rng>(
    rng: &mut R,
    matches: &[Match],
    board: &Board,
) -> (Board, Board) {
    let mut marked = board.clone();
    for m in matches {
        for pos in m.merged() {
            let tile = *marked.get(pos);
            marked.set(pos, tile.remove(m.origin()));
        }
    }

    let mut compacted = marked.clone();
    let size = board.size();
    for x in 0..size {
        let survivors: Vec<Tile> = marked
            .column(x)
            .iter()
            .filter(|t| !t.is_removed())
            .copied()
            .collect();
        let removed = size - survivors.len();
        if removed == 0 {
            continue;
        }
        let mut column = Vec::with_capacity(size);
        for _ in 0..removed {
            column.push(Tile::random(rng));
        }
        column.extend(survivors);
        log::trace!("column {}: {} tiles fell, {} new", x, size - removed, removed);
        compacted.set_column(x, column);
    }
    (marked, compacted)
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rstest::*;

    use super::*;
    use crate::engine::matcher::{detect_match, unique_matches};
    use crate::engine::tile::{Position, TileId, MAX_NEW_VALUE, MIN_NEW_VALUE};

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn column_ids(board: &Board, x: usize) -> Vec<TileId> {
        board.column(x).iter().map(|t| t.id()).collect()
    }

    #[test]
    fn vertical_match_refills_top_of_column() {
        let board = Board::from_rows(&[vec![1, 2, 3], vec![1, 3, 2], vec![1, 2, 3]]);
        let m = detect_match(&Position(0, 2), &board).unwrap();
        let (marked, compacted) = move_tiles_down(&mut rng(), &[m], &board);

        assert_eq!(marked.values(), board.values());
        assert!(!marked.get(&Position(0, 2)).is_removed());
        for y in [0, 1] {
            let t = marked.get(&Position(0, y));
            assert!(t.is_removed());
            assert_eq!(t.merged_to(), Some(Position(0, 2)));
        }

        // the origin survives at the bottom, two fresh tiles above it
        let old_ids = column_ids(&board, 0);
        let new_ids = column_ids(&compacted, 0);
        assert_eq!(new_ids[2], old_ids[2]);
        assert!(!old_ids.contains(&new_ids[0]));
        assert!(!old_ids.contains(&new_ids[1]));
        for y in 0..3 {
            assert!(!compacted.get(&Position(0, y)).is_removed());
        }
        // untouched columns keep their tiles
        assert_eq!(column_ids(&compacted, 1), column_ids(&board, 1));
        assert_eq!(column_ids(&compacted, 2), column_ids(&board, 2));
    }

    #[test]
    fn horizontal_match_drops_tiles_above() {
        let board = Board::from_rows(&[vec![4, 3, 4], vec![2, 2, 2], vec![3, 1, 3]]);
        let m = detect_match(&Position(1, 1), &board).unwrap();
        let (_, compacted) = move_tiles_down(&mut rng(), &[m], &board);

        // the origin column is untouched
        assert_eq!(column_ids(&compacted, 1), column_ids(&board, 1));
        for x in [0, 2] {
            let before = column_ids(&board, x);
            let after = column_ids(&compacted, x);
            assert_eq!(after[1], before[0], "column {}", x);
            assert_eq!(after[2], before[2], "column {}", x);
            assert!(!before.contains(&after[0]), "column {}", x);
            let v = compacted.get(&Position(x, 0)).value();
            assert!((MIN_NEW_VALUE..=MAX_NEW_VALUE).contains(&v));
        }
    }

    #[rstest]
    #[case::column_run(vec![
        vec![1, 2, 3, 4],
        vec![1, 3, 4, 2],
        vec![1, 4, 2, 3],
        vec![2, 3, 4, 1],
    ])]
    #[case::two_runs(vec![
        vec![1, 2, 3, 3],
        vec![1, 3, 2, 3],
        vec![1, 2, 1, 3],
        vec![2, 1, 2, 1],
    ])]
    #[case::cross(vec![
        vec![2, 4, 2, 1],
        vec![4, 4, 4, 3],
        vec![2, 4, 2, 1],
        vec![1, 3, 1, 3],
    ])]
    fn survivors_keep_order_and_sink(#[case] rows: Vec<Vec<u32>>) {
        let board = Board::from_rows(&rows);
        let matches = unique_matches(&board);
        assert!(!matches.is_empty());
        let removed: HashSet<Position> = matches.iter().flat_map(|m| m.merged().copied()).collect();
        let (_, compacted) = move_tiles_down(&mut rng(), &matches, &board);

        for x in 0..board.size() {
            let survivors: Vec<TileId> = (0..board.size())
                .map(|y| Position(x, y))
                .filter(|p| !removed.contains(p))
                .map(|p| board.get(&p).id())
                .collect();
            let count = board.size() - survivors.len();
            let after = column_ids(&compacted, x);
            assert_eq!(after[count..], survivors[..], "column {}", x);
            for id in &after[..count] {
                assert!(!survivors.contains(id));
            }
        }
    }
}
