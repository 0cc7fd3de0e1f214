//! In-memory terminal for driving a REPL without a TTY.
//!
//! Inputs are queued up front (or while running, from listeners); output is
//! recorded with styling removed. Clones share the same state, so a test can
//! hand one clone to the `Repl` and inspect the other.

use super::terminal::{Terminal, TerminalInput};
use super::theme::strip_ansi;
use crate::events::{Key, KeyPress};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

const COLUMNS: u16 = 80;

#[derive(Debug, Default)]
struct ScriptState {
    inputs: VecDeque<TerminalInput>,
    output: Vec<String>,
    renders: Vec<String>,
    clears: usize,
    active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedTerminal {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A terminal that submits each of `lines` in turn, then closes.
    pub fn with_lines(lines: &[&str]) -> Self {
        let terminal = Self::new();
        for line in lines {
            terminal.push_line(line);
        }
        terminal
    }

    pub fn push_line(&self, line: &str) {
        self.push(TerminalInput::Line(line.to_string()));
    }

    pub fn push_key(&self, press: KeyPress) {
        self.push(TerminalInput::Key(press));
    }

    /// Queue one key press per character, then Enter.
    pub fn type_line(&self, text: &str) {
        for c in text.chars() {
            self.push_key(KeyPress::plain(Key::Char(c)));
        }
        self.push_key(KeyPress::plain(Key::Enter));
    }

    pub fn push(&self, input: TerminalInput) {
        self.state.borrow_mut().inputs.push_back(input);
    }

    /// Printed lines, one entry per physical line, without styling.
    pub fn output(&self) -> Vec<String> {
        self.state.borrow().output.clone()
    }

    pub fn output_text(&self) -> String {
        self.output().join("\n")
    }

    /// Every prompt render as `prompt + buffer`.
    pub fn renders(&self) -> Vec<String> {
        self.state.borrow().renders.clone()
    }

    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }
}

impl Terminal for ScriptedTerminal {
    fn activate(&mut self) -> io::Result<()> {
        self.state.borrow_mut().active = true;
        Ok(())
    }

    fn deactivate(&mut self) -> io::Result<()> {
        self.state.borrow_mut().active = false;
        Ok(())
    }

    fn poll_input(&mut self, _timeout: Duration) -> io::Result<Option<TerminalInput>> {
        let next = self.state.borrow_mut().inputs.pop_front();
        Ok(Some(next.unwrap_or(TerminalInput::Closed)))
    }

    fn render_input(&mut self, prompt: &str, buffer: &str, _cursor: u16) -> io::Result<()> {
        self.state
            .borrow_mut()
            .renders
            .push(format!("{prompt}{buffer}"));
        Ok(())
    }

    fn end_input(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> io::Result<()> {
        let plain = strip_ansi(line);
        self.state
            .borrow_mut()
            .output
            .extend(plain.split('\n').map(str::to_string));
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.state.borrow_mut().clears += 1;
        Ok(())
    }

    fn columns(&self) -> u16 {
        COLUMNS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_then_closed() {
        let mut terminal = ScriptedTerminal::with_lines(&["one"]);
        let timeout = Duration::from_millis(0);
        assert_eq!(
            terminal.poll_input(timeout).unwrap(),
            Some(TerminalInput::Line("one".to_string()))
        );
        assert_eq!(
            terminal.poll_input(timeout).unwrap(),
            Some(TerminalInput::Closed)
        );
    }

    #[test]
    fn test_clones_share_output() {
        let terminal = ScriptedTerminal::new();
        let mut handle = terminal.clone();
        handle.print_line("\x1b[31mred\x1b[0m\nsecond").unwrap();
        assert_eq!(terminal.output(), vec!["red", "second"]);
    }

    #[test]
    fn test_type_line_queues_keys_and_enter() {
        let mut terminal = ScriptedTerminal::new();
        terminal.type_line("ab");
        let timeout = Duration::from_millis(0);
        let mut keys = Vec::new();
        while let Some(TerminalInput::Key(press)) = terminal.poll_input(timeout).unwrap() {
            keys.push(press.key);
        }
        assert_eq!(keys, vec![Key::Char('a'), Key::Char('b'), Key::Enter]);
    }
}
