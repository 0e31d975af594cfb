use super::error::Result;
use crate::engine::board::Board;
use crate::engine::matcher::Score;
use crate::engine::tile::Position;

/// Frame is everything drawn on screen at one point in time.
pub(crate) struct Frame<'a> {
    pub(crate) board: &'a Board,
    pub(crate) score: Score,
    pub(crate) moves: u32,
    pub(crate) cursor: Position,
    pub(crate) selected: Option<Position>,
    pub(crate) hint: Option<(Position, Position)>,
    pub(crate) status: &'a str,
}

pub(crate) trait Renderer {
    fn size_hint(&self) -> Result<(u16, u16)>;
    fn render(&mut self, frame: &Frame) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    /// Give the terminal back to the user after a failure.
    fn recover(&mut self);
}
