use std::io::Write;

use crossterm::{
    cursor,
    event::{self, Event as CrossTermEvent, KeyCode, KeyEvent, KeyEventKind},
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
    ExecutableCommand, QueueableCommand,
};

use super::colors::tile_colors;
use super::error::{InnerError, Result};
use super::events::{Event, EventSource, UserInput};
use super::geometry::Direction;
use super::renderer::{Frame, Renderer};
use crate::engine::tile::{Position, Tile};

const TILE_WIDTH: usize = 8;
const BOARD_Y_OFFSET: usize = 2;
const BORDER_WIDTH: usize = 1;
const STATUS_LINES: usize = 3;

/// Lightness added to tiles that are about to disappear.
const REMOVED_LIGHTNESS: f32 = 0.6;

pub(crate) struct Crossterm<T: Write> {
    w: Box<T>,
}

impl<T: Write> Crossterm<T> {
    pub(crate) fn new(mut w: Box<T>) -> Result<Self> {
        terminal::enable_raw_mode()?;
        w.execute(terminal::EnterAlternateScreen)?;
        w.execute(cursor::Hide)?;
        Ok(Self { w })
    }
}

impl<T: Write> Drop for Crossterm<T> {
    fn drop(&mut self) {
        self.recover();
    }
}

impl<T: Write> Renderer for Crossterm<T> {
    fn size_hint(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        let size = frame.board.size();
        let (width, height) = layout_size(size);
        let (columns, rows) = self.size_hint()?;
        if (columns as usize) < width || (rows as usize) < height {
            return Err(InnerError::TerminalTooSmall(width, height).into());
        }

        self.w.queue(terminal::BeginSynchronizedUpdate)?;
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::Clear(ClearType::All))?;

        self.w.queue(cursor::MoveTo(0, 0))?;
        self.w.queue(style::SetAttribute(Attribute::Bold))?;
        self.w.queue(style::Print(format!(
            "exponentile   score {}   moves {}",
            frame.score, frame.moves
        )))?;
        self.w.queue(style::SetAttribute(Attribute::Reset))?;

        self.draw_border(BOARD_Y_OFFSET, width, size + 2 * BORDER_WIDTH)?;

        for pos in frame.board.positions() {
            let hinted = frame.hint.map_or(false, |(a, b)| a == pos || b == pos);
            self.draw_tile(frame.board.get(&pos), &pos, frame, hinted)?;
        }

        let status_y = BOARD_Y_OFFSET + size + 2 * BORDER_WIDTH;
        for (idx, line) in textwrap::wrap(frame.status, width)
            .iter()
            .take(STATUS_LINES)
            .enumerate()
        {
            self.w.queue(cursor::MoveTo(0, (status_y + idx) as u16))?;
            self.w.queue(style::Print(line))?;
        }

        self.w.queue(terminal::EndSynchronizedUpdate)?;
        self.w.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::Clear(ClearType::All))?;
        self.w.flush()?;
        Ok(())
    }

    fn recover(&mut self) {
        let _ = self.w.execute(cursor::Show);
        let _ = self.w.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl<T: Write> Crossterm<T> {
    fn draw_border(&mut self, y: usize, width: usize, height: usize) -> Result<()> {
        let box_corner = boxy::Char::upper_left(boxy::Weight::Doubled);
        let box_horizontal: char = boxy::Char::horizontal(boxy::Weight::Doubled).into();
        let box_vertical: char = boxy::Char::vertical(boxy::Weight::Doubled).into();

        let horizontal = box_horizontal.to_string().repeat(width - 2);
        let top_left: char = box_corner.clone().into();
        let top_right: char = box_corner.clone().rotate_cw(1).into();
        let bottom_right: char = box_corner.clone().rotate_cw(2).into();
        let bottom_left: char = box_corner.clone().rotate_ccw(1).into();

        self.w.queue(cursor::MoveTo(0, y as u16))?;
        self.w.queue(style::Print(format!(
            "{}{}{}",
            top_left, horizontal, top_right
        )))?;
        for row in (y + 1)..(y + height - 1) {
            self.w.queue(cursor::MoveTo(0, row as u16))?;
            self.w.queue(style::Print(box_vertical))?;
            self.w.queue(cursor::MoveTo((width - 1) as u16, row as u16))?;
            self.w.queue(style::Print(box_vertical))?;
        }
        self.w.queue(cursor::MoveTo(0, (y + height - 1) as u16))?;
        self.w.queue(style::Print(format!(
            "{}{}{}",
            bottom_left, horizontal, bottom_right
        )))?;
        Ok(())
    }

    fn draw_tile(
        &mut self,
        tile: &Tile,
        pos: &Position,
        frame: &Frame,
        hinted: bool,
    ) -> Result<()> {
        let (mut background, mut foreground) = tile_colors(tile.value());
        if tile.is_removed() {
            background = background.set_lightness(REMOVED_LIGHTNESS);
            foreground = foreground.set_lightness(REMOVED_LIGHTNESS);
        }
        let x = BORDER_WIDTH + pos.x() * TILE_WIDTH;
        let y = BOARD_Y_OFFSET + BORDER_WIDTH + pos.y();

        self.w.queue(cursor::MoveTo(x as u16, y as u16))?;
        self.w.queue(style::SetBackgroundColor(Color::from(background)))?;
        self.w.queue(style::SetForegroundColor(Color::from(foreground)))?;
        if frame.cursor == *pos {
            self.w.queue(style::SetAttribute(Attribute::Reverse))?;
        }
        if frame.selected == Some(*pos) {
            self.w.queue(style::SetAttribute(Attribute::Bold))?;
            self.w.queue(style::SetAttribute(Attribute::Underlined))?;
        }
        self.w.queue(style::Print(tile_label(tile, pos, hinted)))?;
        self.w.queue(style::SetAttribute(Attribute::Reset))?;
        self.w.queue(style::ResetColor)?;
        Ok(())
    }
}

/// Minimum terminal (width, height) needed to draw a board of the given size.
fn layout_size(size: usize) -> (usize, usize) {
    (
        size * TILE_WIDTH + 2 * BORDER_WIDTH,
        BOARD_Y_OFFSET + size + 2 * BORDER_WIDTH + STATUS_LINES,
    )
}

fn tile_label(tile: &Tile, pos: &Position, hinted: bool) -> String {
    let number = tile.displayed().to_string();
    match tile.merged_to() {
        Some(target) => {
            let arrow = merge_arrow(pos, &target);
            format!("{}{:^w$}{}", arrow, number, arrow, w = TILE_WIDTH - 2)
        }
        None if hinted => format!("*{:^w$}*", number, w = TILE_WIDTH - 2),
        None => format!("{:^w$}", number, w = TILE_WIDTH),
    }
}

// merge_arrow points from a removed tile towards the tile it merged into.
fn merge_arrow(from: &Position, to: &Position) -> char {
    if to.y() < from.y() {
        '↑'
    } else if to.y() > from.y() {
        '↓'
    } else if to.x() < from.x() {
        '←'
    } else {
        '→'
    }
}

#[derive(Default)]
pub(crate) struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    /// Block until the next Crossterm event.
    fn next_event(&mut self) -> Result<Event> {
        loop {
            match event::read()? {
                CrossTermEvent::Key(ke) => match handle_key_event(ke) {
                    Some(ui) => return Ok(Event::UserInput(ui)),
                    None => continue,
                },
                CrossTermEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => continue,
            };
        }
    }
}

fn handle_key_event(ke: KeyEvent) -> Option<UserInput> {
    if ke.kind != KeyEventKind::Press {
        return None;
    }
    match ke.code {
        KeyCode::Left | KeyCode::Char('h') => Some(UserInput::Direction(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(UserInput::Direction(Direction::Right)),
        KeyCode::Up | KeyCode::Char('k') => Some(UserInput::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(UserInput::Direction(Direction::Down)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(UserInput::Select),
        KeyCode::Char('?') => Some(UserInput::Hint),
        KeyCode::Char('u') => Some(UserInput::Undo),
        KeyCode::Char('r') => Some(UserInput::Redo),
        KeyCode::Char('n') => Some(UserInput::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Some(UserInput::Quit),
        _ => None,
    }
}
