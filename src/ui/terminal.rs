//! Terminal session used by the REPL loop.
//!
//! The loop only talks to the `Terminal` trait. `CrosstermTerminal` is the
//! real stdin/stdout implementation: key by key in raw mode when stdin is a
//! TTY, line by line otherwise.

use super::terminal_guard::TerminalGuard;
use crate::events::{Key, KeyPress};
use crossterm::{
    cursor::{MoveTo, MoveToColumn},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, IsTerminal, Stdout, Write};
use std::time::Duration;

const DEFAULT_COLUMNS: u16 = 80;

/// One unit of input from the terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalInput {
    /// A key press (interactive terminals)
    Key(KeyPress),

    /// A whole line (non-interactive input)
    Line(String),

    /// Input is exhausted
    Closed,
}

pub trait Terminal {
    /// Prepare the terminal for the loop (raw mode on a TTY).
    fn activate(&mut self) -> io::Result<()>;

    /// Undo `activate`.
    fn deactivate(&mut self) -> io::Result<()>;

    /// Wait up to `timeout` for input. `None` means nothing arrived.
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<TerminalInput>>;

    /// Clear the current line and draw `prompt` + `buffer`, leaving the
    /// cursor at display column `cursor`.
    fn render_input(&mut self, prompt: &str, buffer: &str, cursor: u16) -> io::Result<()>;

    /// Finish the line that was just submitted.
    fn end_input(&mut self) -> io::Result<()>;

    /// Print one line of output. Every console message goes through here.
    fn print_line(&mut self, line: &str) -> io::Result<()>;

    fn clear_screen(&mut self) -> io::Result<()>;

    /// Terminal width in columns.
    fn columns(&self) -> u16;
}

pub struct CrosstermTerminal {
    stdout: Stdout,
    interactive: bool,
    guard: Option<TerminalGuard>,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            interactive: io::stdin().is_terminal(),
            guard: None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn is_raw(&self) -> bool {
        self.guard.is_some()
    }

    fn read_line(&mut self) -> io::Result<TerminalInput> {
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(TerminalInput::Closed);
        }
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(TerminalInput::Line(trimmed.to_string()))
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn activate(&mut self) -> io::Result<()> {
        if self.interactive && self.guard.is_none() {
            self.guard = Some(TerminalGuard::new()?);
            log::debug!("raw mode enabled");
        }
        Ok(())
    }

    fn deactivate(&mut self) -> io::Result<()> {
        if self.guard.take().is_some() {
            log::debug!("raw mode disabled");
        }
        self.stdout.flush()
    }

    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<TerminalInput>> {
        if !self.is_raw() {
            // blocks until a full line arrives
            return self.read_line().map(Some);
        }

        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                Ok(Some(TerminalInput::Key(key_press(key))))
            }
            _ => Ok(None),
        }
    }

    fn render_input(&mut self, prompt: &str, buffer: &str, cursor: u16) -> io::Result<()> {
        if !self.is_raw() {
            queue!(self.stdout, Print(prompt), Print(buffer))?;
            return self.stdout.flush();
        }
        queue!(
            self.stdout,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(prompt),
            Print(buffer),
            MoveToColumn(cursor)
        )?;
        self.stdout.flush()
    }

    fn end_input(&mut self) -> io::Result<()> {
        if self.is_raw() {
            queue!(self.stdout, Print("\r\n"))?;
        }
        self.stdout.flush()
    }

    fn print_line(&mut self, line: &str) -> io::Result<()> {
        if self.is_raw() {
            let line = line.replace('\n', "\r\n");
            queue!(self.stdout, MoveToColumn(0), Print(line), Print("\r\n"))?;
        } else {
            queue!(self.stdout, Print(line), Print("\n"))?;
        }
        self.stdout.flush()
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(self.stdout, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))
    }

    fn columns(&self) -> u16 {
        terminal::size()
            .map(|(columns, _)| columns)
            .unwrap_or(DEFAULT_COLUMNS)
    }
}

/// Convert a crossterm key event into the REPL's key type.
pub fn key_press(event: KeyEvent) -> KeyPress {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Esc => Key::Esc,
        KeyCode::F(n) => Key::F(n),
        _ => Key::Other,
    };

    KeyPress {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        meta: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    }
}
