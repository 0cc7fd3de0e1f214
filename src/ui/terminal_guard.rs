use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io;

/// Keeps the terminal in raw mode while alive.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> Result<Self, io::Error> {
        enable_raw_mode()?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
