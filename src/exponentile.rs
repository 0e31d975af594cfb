use std::time::Duration;

use crate::engine::board::Board;
use crate::engine::cascade::BoardStep;
use crate::engine::game::{Game, Phase};
use crate::engine::snapshot::Snapshot;
use crate::engine::tile::Position;
use crate::error::{Error, Result};
use crate::tui::events::{Event, EventSource, UserInput};
use crate::tui::geometry::Cursor;
use crate::tui::renderer::{Frame, Renderer};

const HELP: &str = "arrows/hjkl move, space select, ? hint, u/r undo/redo, n new game, q quit";

/// Exponentile drives a game from terminal input, animating every step of each move.
pub(crate) struct Exponentile<R: Renderer, E: EventSource> {
    renderer: R,
    event_source: E,
    game: Game,
    cursor: Cursor,
    hint: Option<(Position, Position)>,
    status: String,
    step_delay: Duration,
    celebrated: bool,
}

impl<R: Renderer, E: EventSource> Exponentile<R, E> {
    pub(crate) fn new(game: Game, renderer: R, event_source: E, step_delay: Duration) -> Self {
        let cursor = Cursor::new(game.size());
        let celebrated = game.reached_2048();
        Self {
            renderer,
            event_source,
            game,
            cursor,
            hint: None,
            status: String::from(HELP),
            step_delay,
            celebrated,
        }
    }

    /// Run takes control of the terminal until the player quits and returns the final state of
    /// the game.
    pub(crate) fn run(mut self) -> Result<Snapshot> {
        match self.inner_run() {
            Err(e) => {
                self.renderer.recover();
                Err(e)
            }
            Ok(_) => Ok(self.game.snapshot()),
        }
    }

    fn inner_run(&mut self) -> Result<()> {
        if self.game.phase() == &Phase::GameOver {
            self.status = String::from("no moves left, press n for a new game");
        }
        loop {
            let board = self.game.board().clone();
            self.draw(&board, self.game.score())?;

            match self.event_source.next_event()? {
                Event::UserInput(UserInput::Direction(d)) => {
                    self.cursor.translate(&d);
                    log::trace!("cursor {} to {}", d, self.cursor.position());
                }
                Event::UserInput(UserInput::Select) => self.select()?,
                Event::UserInput(UserInput::Hint) => self.show_hint(),
                Event::UserInput(UserInput::Undo) => {
                    if self.game.undo() {
                        self.hint = None;
                        self.status = format!("undid move {}", self.game.moves() + 1);
                    }
                }
                Event::UserInput(UserInput::Redo) => {
                    if self.game.redo() {
                        self.hint = None;
                        self.status = format!("redid move {}", self.game.moves());
                    }
                }
                Event::UserInput(UserInput::NewGame) => {
                    self.game.reset()?;
                    self.hint = None;
                    self.celebrated = false;
                    self.status = String::from(HELP);
                }
                Event::UserInput(UserInput::Quit) => break,
                Event::Resize => self.renderer.clear()?,
            }
        }
        Ok(())
    }
}

impl<R: Renderer, E: EventSource> Exponentile<R, E> {
    fn draw(&mut self, board: &Board, score: u64) -> Result<()> {
        let selected = match self.game.phase() {
            Phase::Selected(p) => Some(*p),
            _ => None,
        };
        let frame = Frame {
            board,
            score,
            moves: self.game.moves(),
            cursor: self.cursor.position(),
            selected,
            hint: self.hint,
            status: &self.status,
        };
        match self.renderer.render(&frame) {
            Err(source) if source.is_terminal_too_small() => {
                log::warn!("{}", source.inner);
                self.renderer.clear()?;
                Ok(())
            }
            Err(source) => Err(Error::TuiError { source }),
            Ok(()) => Ok(()),
        }
    }

    fn select(&mut self) -> Result<()> {
        let pos = self.cursor.position();
        match self.game.select(pos)? {
            Some(steps) => self.animate(steps),
            None => Ok(()),
        }
    }

    fn animate(&mut self, steps: Vec<BoardStep>) -> Result<()> {
        self.hint = None;
        let mut score = self.game.score();
        let mut earned: u64 = 0;
        for (idx, step) in steps.iter().enumerate() {
            score = score.saturating_add(step.points);
            earned = earned.saturating_add(step.points);
            self.draw(&step.board, score)?;
            if idx + 1 < steps.len() {
                std::thread::sleep(self.step_delay);
            }
        }

        self.status = match self.game.settle() {
            Phase::GameOver => format!("+{} points. no moves left, press n for a new game", earned),
            _ if earned == 0 => String::from("those tiles do not make a match"),
            _ => format!("+{} points", earned),
        };
        if !self.celebrated && self.game.reached_2048() {
            self.celebrated = true;
            self.status.push_str(". you made 2048!");
        }
        Ok(())
    }

    fn show_hint(&mut self) {
        self.hint = self.game.hint();
        self.status = match self.hint {
            Some((a, b)) => format!("try swapping {} and {}", a, b),
            None => String::from("no moves left"),
        };
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    use super::*;
    use crate::engine::rng::GameRng;
    use crate::tui::error::{InnerError, Result as TuiResult};
    use crate::tui::geometry::Direction;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Vec<u32>, u64, String)>,
        too_small: bool,
    }

    impl Renderer for Recorder {
        fn size_hint(&self) -> TuiResult<(u16, u16)> {
            Ok((80, 24))
        }

        fn render(&mut self, frame: &Frame) -> TuiResult<()> {
            if self.too_small {
                return Err(InnerError::TerminalTooSmall(80, 24).into());
            }
            self.frames.push((
                frame.board.values(),
                frame.score,
                frame.status.to_string(),
            ));
            Ok(())
        }

        fn clear(&mut self) -> TuiResult<()> {
            Ok(())
        }

        fn recover(&mut self) {}
    }

    struct Scripted(VecDeque<Event>);

    impl EventSource for Scripted {
        fn next_event(&mut self) -> TuiResult<Event> {
            Ok(self
                .0
                .pop_front()
                .unwrap_or(Event::UserInput(UserInput::Quit)))
        }
    }

    fn script(inputs: Vec<UserInput>) -> Scripted {
        Scripted(inputs.into_iter().map(Event::UserInput).collect())
    }

    fn game() -> Game {
        // column 0 reads 1, 1, 2; swapping (0, 2) and (1, 2) completes it
        let snapshot: Snapshot = "3:0:0:1,2,3,1,3,2,2,1,3".parse().unwrap();
        Game::restore(GameRng::new(42), &snapshot).unwrap()
    }

    fn app(inputs: Vec<UserInput>) -> Exponentile<Recorder, Scripted> {
        Exponentile::new(game(), Recorder::default(), script(inputs), Duration::ZERO)
    }

    #[test]
    fn quit_returns_state() {
        let snapshot = app(vec![UserInput::Quit]).run().unwrap();
        assert_eq!(snapshot.to_string(), "3:0:0:1,2,3,1,3,2,2,1,3:42:9");
    }

    #[test]
    fn plays_a_move() {
        let mut app = app(vec![
            UserInput::Direction(Direction::Down),
            UserInput::Direction(Direction::Down),
            UserInput::Select,
            UserInput::Direction(Direction::Right),
            UserInput::Select,
        ]);
        app.inner_run().unwrap();
        assert_eq!(app.game.moves(), 1);
        assert!(app.game.score() >= 8);
        assert!(app.status.starts_with('+'));
        // one frame per input, at least four animation frames and the final frame
        assert!(app.renderer.frames.len() >= 5 + 4 + 1);
        let last = app.renderer.frames.last().unwrap();
        assert_eq!(last.1, app.game.score());
        assert_eq!(last.0, app.game.board().values());
    }

    #[test]
    fn snap_back_is_reported() {
        let mut app = app(vec![
            UserInput::Select,
            UserInput::Direction(Direction::Right),
            UserInput::Select,
        ]);
        app.inner_run().unwrap();
        assert_eq!(app.game.moves(), 0);
        assert_eq!(app.status, "those tiles do not make a match");
        assert_eq!(app.game.board().values(), vec![1, 2, 3, 1, 3, 2, 2, 1, 3]);
    }

    #[test]
    fn hint_then_undo() {
        let mut app = app(vec![UserInput::Hint]);
        app.inner_run().unwrap();
        assert_eq!(app.hint, Some((Position(1, 1), Position(2, 1))));
        assert!(app.status.starts_with("try swapping"));
        assert!(!app.game.undo());
    }

    #[test]
    fn small_terminal_is_not_fatal() {
        let mut app = app(vec![UserInput::Hint]);
        app.renderer.too_small = true;
        app.inner_run().unwrap();
        assert!(app.renderer.frames.is_empty());
    }
}
