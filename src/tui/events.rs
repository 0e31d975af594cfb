use super::error::Result;
use super::geometry::Direction;

pub(crate) trait EventSource {
    fn next_event(&mut self) -> Result<Event>;
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
    UserInput(UserInput),
    Resize,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum UserInput {
    /// Move the cursor.
    Direction(Direction),
    /// Pick the tile under the cursor.
    Select,
    Hint,
    Undo,
    Redo,
    NewGame,
    Quit,
}
