use std::collections::BTreeSet;

use rand::Rng;

use super::matcher::all_matches;
use super::tile::{random_value, Position, Tile, Value};
use crate::error::{Error, Result};

pub(crate) const DEFAULT_SIZE: usize = 8;

/// Upper bound on reroll passes while generating a board without matches.
pub(crate) const MAX_GENERATION_PASSES: usize = 1000;

pub(crate) const VALUE_2048: Value = 11;

/// Largest value accepted when loading a board, the biggest power of two a `u64` holds.
/// Merges can still push values past it; scores saturate from there on.
pub(crate) const MAX_LOADED_VALUE: Value = 63;

/// Board is a square grid of tiles indexed `[x][y]`. Every cell always holds a tile. Boards
/// are values: every transformation works on a clone so previously returned boards can be
/// kept and replayed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    columns: Vec<Vec<Tile>>,
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.size() {
            for x in 0..self.size() {
                let tile = self.get(&Position(x, y));
                let marker = if tile.is_removed() { "*" } else { " " };
                write!(f, "{:>6}{}", tile.displayed(), marker)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// public methods
impl Board {
    /// Generate a board of random tiles that contains no matches. Tiles that are part of a
    /// match get a fresh value (keeping their id) until the board is stable.
    pub(crate) fn random<R: Rng>(rng: &mut R, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidSize(size));
        }
        let mut columns = Vec::with_capacity(size);
        for _ in 0..size {
            let mut column = Vec::with_capacity(size);
            for _ in 0..size {
                column.push(Tile::random(rng));
            }
            columns.push(column);
        }
        let mut board = Board { columns };
        board.reroll_matches(rng)?;
        Ok(board)
    }

    /// Rebuild a board from row-major values as produced by [`Board::values`]. Tile ids are
    /// not persisted so fresh ones are drawn from the rng.
    pub(crate) fn reconstruct<R: Rng>(rng: &mut R, values: &[Value], size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidSize(size));
        }
        if values.len() != size * size {
            return Err(Error::InvalidBoard(format!(
                "expected {} values for size {}, got {}",
                size * size,
                size,
                values.len()
            )));
        }
        if let Some(idx) = values
            .iter()
            .position(|v| !(1..=MAX_LOADED_VALUE).contains(v))
        {
            return Err(Error::InvalidBoard(format!(
                "value {} at index {} is outside 1..={}",
                values[idx], idx, MAX_LOADED_VALUE
            )));
        }
        let columns = (0..size)
            .map(|x| {
                (0..size)
                    .map(|y| Tile::new(0, values[y * size + x]))
                    .collect::<Vec<Tile>>()
            })
            .collect();
        let mut board = Board { columns };
        for pos in board.positions() {
            let tile = board.get(&pos);
            board.set(&pos, Tile::new(rng.gen(), tile.value()));
        }
        Ok(board)
    }

    pub(crate) fn size(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn contains(&self, pos: &Position) -> bool {
        pos.x() < self.size() && pos.y() < self.size()
    }

    pub(crate) fn check(&self, pos: &Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                position: *pos,
                size: self.size(),
            })
        }
    }

    pub(crate) fn get(&self, pos: &Position) -> &Tile {
        self.columns
            .get(pos.x())
            .unwrap_or_else(|| panic!("invalid x coordinate {}", pos.x()))
            .get(pos.y())
            .unwrap_or_else(|| panic!("invalid y coordinate {}", pos.y()))
    }

    pub(crate) fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size();
        (0..size).flat_map(move |y| (0..size).map(move |x| Position(x, y)))
    }

    /// Row-major tile values, the layout used to persist and share boards.
    pub(crate) fn values(&self) -> Vec<Value> {
        self.positions().map(|p| self.get(&p).value()).collect()
    }

    pub(crate) fn max_value(&self) -> Value {
        self.columns
            .iter()
            .flatten()
            .map(|t| t.value())
            .max()
            .unwrap_or_default()
    }

    pub(crate) fn contains_value(&self, value: Value) -> bool {
        self.columns.iter().flatten().any(|t| t.value() == value)
    }

    pub(crate) fn swapped(&self, a: &Position, b: &Position) -> Board {
        let mut board = self.clone();
        let (ta, tb) = (*self.get(a), *self.get(b));
        board.set(a, tb);
        board.set(b, ta);
        board
    }
}

// crate-internal mutation, only ever applied to a fresh copy
impl Board {
    pub(crate) fn set(&mut self, pos: &Position, tile: Tile) {
        let rf = self
            .columns
            .get_mut(pos.x())
            .unwrap_or_else(|| panic!("invalid x coordinate {}", pos.x()))
            .get_mut(pos.y())
            .unwrap_or_else(|| panic!("invalid y coordinate {}", pos.y()));
        *rf = tile;
    }

    pub(crate) fn column(&self, x: usize) -> &[Tile] {
        &self.columns[x]
    }

    pub(crate) fn set_column(&mut self, x: usize, column: Vec<Tile>) {
        self.columns[x] = column;
    }

    fn reroll_matches<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        for pass in 0..MAX_GENERATION_PASSES {
            let matched: BTreeSet<Position> = all_matches(self)
                .iter()
                .flat_map(|m| m.tiles().iter().copied())
                .collect();
            if matched.is_empty() {
                log::debug!("generated {0}x{0} board after {1} passes", self.size(), pass);
                return Ok(());
            }
            log::trace!("pass {}: rerolling {} matched tiles", pass, matched.len());
            for pos in matched {
                let tile = *self.get(&pos);
                self.set(&pos, tile.with_value(random_value(rng)));
            }
        }
        Err(Error::GenerationExhausted(MAX_GENERATION_PASSES))
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[Vec<Value>]) -> Board {
        let size = rows.len();
        let columns = (0..size)
            .map(|x| {
                (0..size)
                    .map(|y| Tile::new((y * size + x) as u64, rows[y][x]))
                    .collect()
            })
            .collect();
        Board { columns }
    }
}

pub(crate) fn reached_2048(board: &Board) -> bool {
    board.contains_value(VALUE_2048)
}
