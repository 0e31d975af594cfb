use rand::rngs::StdRng;
use rand::SeedableRng;

use super::board::{reached_2048, Board};
use super::cascade::{total_points, BoardStep};
use super::hint::{almost_matching_pair, is_game_over};
use super::matcher::Score;
use super::rng::GameRng;
use super::snapshot::Snapshot;
use super::swap::swap_tile;
use super::tile::Position;
use crate::error::Result;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Selected(Position),
    /// The caller is animating the steps of a swap; input is ignored until `settle`.
    Swapping,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Round {
    board: Board,
    score: Score,
    moves: u32,
}

impl Round {
    fn new(board: Board) -> Self {
        Self {
            board,
            score: 0,
            moves: 0,
        }
    }
}

/// Game keeps track of the history of rounds of a single game along with the random source
/// used for every new tile.
pub(crate) struct Game {
    rng: GameRng,
    size: usize,
    rounds: Vec<Round>,
    current: usize,
    phase: Phase,
    pending: Option<Round>,
}

// public methods
impl Game {
    pub(crate) fn new(mut rng: GameRng, size: usize) -> Result<Self> {
        let board = Board::random(&mut rng, size)?;
        Ok(Self::with_round(rng, Round::new(board)))
    }

    /// Resume a game from its persisted form. A snapshot that carries its random state
    /// continues from exactly there and `rng` is dropped; otherwise `rng` takes over.
    pub(crate) fn restore(mut rng: GameRng, snapshot: &Snapshot) -> Result<Self> {
        let board = match snapshot.rng {
            Some(state) => {
                // ids are not persisted; drawing them from the game rng would shift it
                let mut ids = StdRng::seed_from_u64(state.seed ^ state.draws);
                rng = GameRng::resume(state);
                snapshot.board(&mut ids)?
            }
            None => snapshot.board(&mut rng)?,
        };
        let round = Round {
            board,
            score: snapshot.score,
            moves: snapshot.moves,
        };
        Ok(Self::with_round(rng, round))
    }

    pub(crate) fn phase(&self) -> &Phase {
        &self.phase
    }

    pub(crate) fn board(&self) -> &Board {
        &self.round().board
    }

    pub(crate) fn score(&self) -> Score {
        self.round().score
    }

    pub(crate) fn moves(&self) -> u32 {
        self.round().moves
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn reached_2048(&self) -> bool {
        reached_2048(self.board())
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        let round = self.round();
        Snapshot {
            size: self.size,
            values: round.board.values(),
            score: round.score,
            moves: round.moves,
            rng: Some(self.rng.state()),
        }
    }

    pub(crate) fn hint(&self) -> Option<(Position, Position)> {
        almost_matching_pair(self.board())
    }

    /// Handle the player picking a tile. Picking a second tile swaps the two and returns the
    /// steps to animate; the game then stays in `Phase::Swapping` until `settle` is called.
    pub(crate) fn select(&mut self, pos: Position) -> Result<Option<Vec<BoardStep>>> {
        self.board().check(&pos)?;
        match self.phase.clone() {
            Phase::Idle => {
                self.phase = Phase::Selected(pos);
                Ok(None)
            }
            Phase::Selected(selected) if selected == pos => {
                self.phase = Phase::Idle;
                Ok(None)
            }
            Phase::Selected(selected) => {
                let round = self.round().clone();
                let steps = match swap_tile(&mut self.rng, &selected, &pos, &round.board) {
                    Ok(steps) => steps,
                    Err(e) => {
                        self.phase = Phase::Idle;
                        return Err(e);
                    }
                };
                // a snap-back is always exactly two steps, a real move at least four
                if steps.len() > 2 {
                    let board = steps
                        .last()
                        .expect("a valid swap always yields steps")
                        .board
                        .clone();
                    self.pending = Some(Round {
                        board,
                        score: round.score.saturating_add(total_points(&steps)),
                        moves: round.moves + 1,
                    });
                }
                self.phase = Phase::Swapping;
                Ok(Some(steps))
            }
            Phase::Swapping | Phase::GameOver => {
                log::debug!("ignoring selection of {} in phase {:?}", pos, self.phase);
                Ok(None)
            }
        }
    }

    /// Finish a swap once its steps have been shown, committing the new round if the swap
    /// was a real move.
    pub(crate) fn settle(&mut self) -> &Phase {
        if self.phase != Phase::Swapping {
            return &self.phase;
        }
        if let Some(round) = self.pending.take() {
            self.rounds.truncate(self.current + 1);
            self.rounds.push(round);
            self.current += 1;
            log::info!(
                "move {}: score {}, best tile {}",
                self.moves(),
                self.score(),
                self.board().max_value()
            );
        }
        self.phase = self.resting_phase();
        &self.phase
    }

    pub(crate) fn reset(&mut self) -> Result<()> {
        let board = Board::random(&mut self.rng, self.size)?;
        self.rounds = vec![Round::new(board)];
        self.current = 0;
        self.pending = None;
        self.phase = Phase::Idle;
        log::info!("new game");
        Ok(())
    }

    pub(crate) fn undo(&mut self) -> bool {
        if self.phase == Phase::Swapping || self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.phase = self.resting_phase();
        true
    }

    pub(crate) fn redo(&mut self) -> bool {
        if self.phase == Phase::Swapping || self.current + 1 >= self.rounds.len() {
            return false;
        }
        self.current += 1;
        self.phase = self.resting_phase();
        true
    }
}

// private methods
impl Game {
    fn with_round(rng: GameRng, round: Round) -> Self {
        let mut game = Self {
            rng,
            size: round.board.size(),
            rounds: Vec::with_capacity(2000),
            current: 0,
            phase: Phase::Idle,
            pending: None,
        };
        game.rounds.push(round);
        game.phase = game.resting_phase();
        game
    }

    fn round(&self) -> &Round {
        self.rounds
            .get(self.current)
            .expect("the current round always exists")
    }

    fn resting_phase(&self) -> Phase {
        if is_game_over(self.board()) {
            Phase::GameOver
        } else {
            Phase::Idle
        }
    }
}
