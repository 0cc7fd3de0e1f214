pub mod line_editor;
pub mod scripted;
pub mod terminal;
pub mod terminal_guard;
pub mod theme;

pub use line_editor::{EditOutcome, LineEditor};
pub use scripted::ScriptedTerminal;
pub use terminal::{CrosstermTerminal, Terminal, TerminalInput};
pub use terminal_guard::TerminalGuard;
