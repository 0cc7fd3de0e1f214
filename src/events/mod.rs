//! Event vocabulary and payloads.
//!
//! The set of event names is closed: `EventKind` is the only way to
//! subscribe, and string names are checked against it up front.

pub mod bus;

pub use bus::{EventBus, Listener};

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    Line,
    Keypress,
    CursorMove,
    Command,
    CommandNotFound,
    CommandNotSpecified,
    DidYouMean,
    Exit,
    UncaughtError,
    UnhandledRejection,
}

impl EventKind {
    pub const ALL: [EventKind; 11] = [
        EventKind::Command,
        EventKind::Exit,
        EventKind::Start,
        EventKind::UncaughtError,
        EventKind::Keypress,
        EventKind::Line,
        EventKind::CursorMove,
        EventKind::CommandNotFound,
        EventKind::CommandNotSpecified,
        EventKind::DidYouMean,
        EventKind::UnhandledRejection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Line => "line",
            EventKind::Keypress => "keypress",
            EventKind::CursorMove => "cursor-move",
            EventKind::Command => "command",
            EventKind::CommandNotFound => "command-not-found",
            EventKind::CommandNotSpecified => "command-not-specified",
            EventKind::DidYouMean => "did-you-mean",
            EventKind::Exit => "exit",
            EventKind::UncaughtError => "uncaught-error",
            EventKind::UnhandledRejection => "unhandled-rejection",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name.is_empty() {
            return Err(ConfigError::MissingEventName);
        }
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownEvent {
                name: name.to_string(),
                valid: EventKind::ALL.map(|k| k.as_str()).join(", "),
            })
    }
}

/// A key as reported by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Esc,
    F(u8),
    Other,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
            meta: false,
            shift: false,
        }
    }

    /// Readable key name ("a", "return", "up", "f5", ...).
    pub fn name(&self) -> String {
        match self.key {
            Key::Char(' ') => "space".to_string(),
            Key::Char(c) => c.to_lowercase().to_string(),
            Key::Enter => "return".to_string(),
            Key::Backspace => "backspace".to_string(),
            Key::Delete => "delete".to_string(),
            Key::Left => "left".to_string(),
            Key::Right => "right".to_string(),
            Key::Up => "up".to_string(),
            Key::Down => "down".to_string(),
            Key::Home => "home".to_string(),
            Key::End => "end".to_string(),
            Key::Tab => "tab".to_string(),
            Key::Esc => "escape".to_string(),
            Key::F(n) => format!("f{n}"),
            Key::Other => "undefined".to_string(),
        }
    }

    /// The printable character typed, if any.
    pub fn char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.ctrl && !self.meta => Some(c),
            _ => None,
        }
    }

    pub fn is_interrupt(&self) -> bool {
        self.ctrl && matches!(self.key, Key::Char('c') | Key::Char('C'))
    }
}

/// Cursor position relative to the start of the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPos {
    pub cols: u16,
    pub rows: u16,
}

/// An event and its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start,
    Line { line: String },
    Keypress { ch: Option<char>, key: KeyPress },
    CursorMove { cursor: CursorPos },
    Command { name: String, args: String },
    CommandNotFound { name: String },
    CommandNotSpecified,
    DidYouMean { name: String, suggestions: Vec<String> },
    Exit { code: i32 },
    UncaughtError { message: String },
    UnhandledRejection { reason: String },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Start => EventKind::Start,
            Event::Line { .. } => EventKind::Line,
            Event::Keypress { .. } => EventKind::Keypress,
            Event::CursorMove { .. } => EventKind::CursorMove,
            Event::Command { .. } => EventKind::Command,
            Event::CommandNotFound { .. } => EventKind::CommandNotFound,
            Event::CommandNotSpecified => EventKind::CommandNotSpecified,
            Event::DidYouMean { .. } => EventKind::DidYouMean,
            Event::Exit { .. } => EventKind::Exit,
            Event::UncaughtError { .. } => EventKind::UncaughtError,
            Event::UnhandledRejection { .. } => EventKind::UnhandledRejection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_parses_from_its_name() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_names_are_config_errors() {
        for name in ["commands", "Start", "cursor_move", "error", " line"] {
            let err = name.parse::<EventKind>().unwrap_err();
            assert!(matches!(err, ConfigError::UnknownEvent { .. }), "{name}");
        }
        assert_eq!(
            "".parse::<EventKind>(),
            Err(ConfigError::MissingEventName)
        );
    }

    #[test]
    fn test_event_kind_matches_payload() {
        assert_eq!(Event::Start.kind(), EventKind::Start);
        assert_eq!(
            Event::Line {
                line: "x".to_string()
            }
            .kind(),
            EventKind::Line
        );
        assert_eq!(Event::Exit { code: 0 }.kind(), EventKind::Exit);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(KeyPress::plain(Key::Enter).name(), "return");
        assert_eq!(KeyPress::plain(Key::Char('A')).name(), "a");
        assert_eq!(KeyPress::plain(Key::F(5)).name(), "f5");
        assert_eq!(KeyPress::ctrl('c').name(), "c");
    }

    #[test]
    fn test_ctrl_keys_have_no_char() {
        assert_eq!(KeyPress::ctrl('c').char(), None);
        assert!(KeyPress::ctrl('c').is_interrupt());
        assert_eq!(KeyPress::plain(Key::Char('q')).char(), Some('q'));
        assert!(!KeyPress::plain(Key::Char('c')).is_interrupt());
    }
}
