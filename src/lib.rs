//! creply: a small framework for building line-based command REPLs.
//!
//! A host registers commands, subscribes to lifecycle events and starts the
//! loop. Lines starting with the command prefix are dispatched to built-ins
//! (`help`, `clear`, `exit`, `usage`) or to registered commands; unknown
//! names get "did you mean" suggestions. Every submitted line is appended to
//! a history file that backs Up/Down recall.

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod repl;
pub mod ui;

pub use commands::suggest;
pub use config::{OptionName, Options, OptionsPatch};
pub use error::{ConfigError, ReplError};
pub use events::{CursorPos, Event, EventKind, Key, KeyPress};
pub use history::HistoryStore;
pub use repl::{RejectionHandle, Repl};
pub use ui::{ScriptedTerminal, Terminal, TerminalInput};
