use rand::Rng;

use super::board::Board;
use super::matcher::Score;
use super::rng::RngState;
use super::tile::Value;
use crate::error::{Error, Result};

/// Snapshot is the persisted shape of a game: the board size, row-major tile values, score,
/// move count and, when known, where the random source stood. Its text form is
/// `size:score:moves:v,v,...` optionally followed by `:seed:draws`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) size: usize,
    pub(crate) values: Vec<Value>,
    pub(crate) score: Score,
    pub(crate) moves: u32,
    pub(crate) rng: Option<RngState>,
}

impl Snapshot {
    /// A fresh game on a board given only by its values; the size is inferred from the
    /// number of values, which must be a perfect square.
    pub(crate) fn from_values(values: Vec<Value>) -> Result<Self> {
        let size = (1..=values.len())
            .find(|s| s * s >= values.len())
            .unwrap_or_default();
        if values.is_empty() || size * size != values.len() {
            return Err(Error::InvalidBoard(format!(
                "{} values do not make a square board",
                values.len()
            )));
        }
        Ok(Self {
            size,
            values,
            score: 0,
            moves: 0,
            rng: None,
        })
    }

    pub(crate) fn board<R: Rng>(&self, rng: &mut R) -> Result<Board> {
        Board::reconstruct(rng, &self.values, self.size)
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<String>>()
            .join(",");
        write!(f, "{}:{}:{}:{}", self.size, self.score, self.moves, values)?;
        if let Some(state) = &self.rng {
            write!(f, ":{}:{}", state.seed, state.draws)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Snapshot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        let (size, score, moves, values, rng) = match fields.as_slice() {
            [size, score, moves, values] => (size, score, moves, values, None),
            [size, score, moves, values, seed, draws] => {
                let state = RngState {
                    seed: parse(seed, "seed")?,
                    draws: parse(draws, "draws")?,
                };
                (size, score, moves, values, Some(state))
            }
            _ => {
                return Err(Error::InvalidBoard(format!(
                    "expected 4 or 6 fields, got {}",
                    fields.len()
                )))
            }
        };
        let snapshot = Snapshot {
            size: parse(size, "size")?,
            score: parse(score, "score")?,
            moves: parse(moves, "moves")?,
            values: parse_values(values)?,
            rng,
        };
        if snapshot.values.len() != snapshot.size * snapshot.size {
            return Err(Error::InvalidBoard(format!(
                "expected {} values, got {}",
                snapshot.size * snapshot.size,
                snapshot.values.len()
            )));
        }
        Ok(snapshot)
    }
}

pub(crate) fn parse_values(s: &str) -> Result<Vec<Value>> {
    s.split(',').map(|v| parse(v, "value")).collect()
}

fn parse<T: std::str::FromStr>(s: &str, field: &str) -> Result<T> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidBoard(format!("invalid {}: {:?}", field, s)))
}
