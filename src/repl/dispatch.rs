//! Loop state machine and line evaluation.

use super::lifecycle::{LifecycleHandler, Outcome};
use super::Repl;
use crate::commands::{parse_line, suggest, Builtin, ParsedLine};
use crate::error::ReplError;
use crate::events::{Event, KeyPress};
use crate::ui::theme;
use crate::ui::{EditOutcome, TerminalInput};
use anyhow::Context;
use std::rc::Rc;
use std::time::Duration;

/// How long one terminal poll waits before checking for rejections.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoopState {
    Idle,
    AwaitingLine,
    Processing(String),
    Exiting(i32),
}

impl Repl {
    pub(crate) fn run(&self) -> Result<i32, ReplError> {
        let lifecycle = LifecycleHandler::new(self);

        let mut state = match lifecycle.catch_failure(|| self.events.emit(self, &Event::Start)) {
            Outcome::Fatal => LoopState::Exiting(1),
            _ => self.requested_exit().unwrap_or(LoopState::Idle),
        };

        loop {
            log::trace!("loop state {state:?}");
            state = match state {
                LoopState::Idle => self.prepare_prompt()?,
                LoopState::AwaitingLine => self.await_line(&lifecycle)?,
                LoopState::Processing(line) => {
                    match lifecycle.catch_failure(|| self.process_line(&line)) {
                        Outcome::Fatal => LoopState::Exiting(1),
                        _ => self.requested_exit().unwrap_or(LoopState::Idle),
                    }
                }
                LoopState::Exiting(code) => {
                    lifecycle.exit(code);
                    return Ok(code);
                }
            };
        }
    }

    /// `Exiting` when a listener or executor called `exit`.
    fn requested_exit(&self) -> Option<LoopState> {
        self.exit_request.take().map(LoopState::Exiting)
    }

    /// Reload history from disk, reset the editor and draw the prompt.
    fn prepare_prompt(&self) -> Result<LoopState, ReplError> {
        let history = self.history();
        let recall = history.load().map_err(|source| ReplError::History {
            path: history.path().to_path_buf(),
            source,
        })?;
        self.editor.borrow_mut().begin(recall);
        self.redisplay();
        Ok(LoopState::AwaitingLine)
    }

    fn await_line(&self, lifecycle: &LifecycleHandler<'_>) -> Result<LoopState, ReplError> {
        loop {
            if lifecycle.drain_rejections(&self.rejections) == Outcome::Fatal {
                return Ok(LoopState::Exiting(1));
            }
            if let Some(exiting) = self.requested_exit() {
                self.end_input();
                return Ok(exiting);
            }

            let input = self
                .terminal
                .borrow_mut()
                .poll_input(POLL_INTERVAL)
                .map_err(ReplError::Terminal)?;

            let press = match input {
                None => continue,
                Some(TerminalInput::Line(line)) => return Ok(LoopState::Processing(line)),
                Some(TerminalInput::Closed) => {
                    log::debug!("input closed");
                    self.end_input();
                    return Ok(LoopState::Exiting(0));
                }
                Some(TerminalInput::Key(press)) => press,
            };

            // Ctrl-C leaves immediately, without the keypress event or the
            // exit built-in.
            if press.is_interrupt() {
                self.end_input();
                return Ok(LoopState::Exiting(0));
            }

            let edit = self.editor.borrow_mut().apply(&press);
            if edit == EditOutcome::Redraw {
                self.redisplay();
            }

            match lifecycle.catch_failure(|| self.key_events(press)) {
                Outcome::Fatal => return Ok(LoopState::Exiting(1)),
                Outcome::Recovered => self.redisplay(),
                Outcome::Completed => {}
            }

            // an exit requested by a key listener wins over a submitted line
            if let Some(exiting) = self.requested_exit() {
                self.end_input();
                return Ok(exiting);
            }

            if let EditOutcome::Submit(line) = edit {
                self.end_input();
                return Ok(LoopState::Processing(line));
            }
        }
    }

    fn key_events(&self, press: KeyPress) -> anyhow::Result<()> {
        self.events.emit(
            self,
            &Event::Keypress {
                ch: press.char(),
                key: press,
            },
        )?;

        let prompt = self.options.borrow().prompt.clone();
        let columns = self.terminal.borrow().columns();
        let cursor = self.editor.borrow().cursor_pos(&prompt, columns);
        self.events.emit(self, &Event::CursorMove { cursor })
    }

    fn end_input(&self) {
        if let Err(e) = self.terminal.borrow_mut().end_input() {
            log::warn!("failed to end input line: {e}");
        }
    }

    /// Record a submitted line, announce it, then evaluate it.
    fn process_line(&self, line: &str) -> anyhow::Result<()> {
        let history = self.history();
        history
            .append(line)
            .with_context(|| format!("cannot append to {}", history.path().display()))?;

        self.events.emit(
            self,
            &Event::Line {
                line: line.to_string(),
            },
        )?;
        self.eval(line)
    }

    /// Evaluate one input line: run a built-in or a registered command, or
    /// report that nothing matched. Lines without the prefix are ignored.
    pub fn eval(&self, line: &str) -> anyhow::Result<()> {
        let prefix = self.options.borrow().prefix.clone();
        match parse_line(line, &prefix) {
            ParsedLine::Text => Ok(()),
            ParsedLine::Empty => self.command_not_specified(),
            ParsedLine::Invocation { command, args } => {
                log::debug!("dispatch {command:?} args {args:?}");
                if let Some(builtin) = Builtin::from_name(&command) {
                    self.run_builtin(builtin, &args)
                } else if self.has_command(&command) {
                    self.run_command(&command, &args)
                } else {
                    let mut candidates: Vec<String> =
                        Builtin::ALL.iter().map(|b| b.name().to_string()).collect();
                    candidates.extend(self.command_names());
                    self.command_not_found(&command, &candidates)
                }
            }
        }
    }

    fn run_builtin(&self, builtin: Builtin, args: &str) -> anyhow::Result<()> {
        match builtin {
            Builtin::Help => self.help(),
            Builtin::Clear => self.clear(),
            Builtin::Exit => self.exit(0),
            Builtin::Usage => return self.usage(args),
        }
        Ok(())
    }

    fn run_command(&self, name: &str, args: &str) -> anyhow::Result<()> {
        self.events.emit(
            self,
            &Event::Command {
                name: name.to_string(),
                args: args.to_string(),
            },
        )?;

        // a command listener may have removed it
        let executor = self
            .commands
            .borrow()
            .get(name)
            .map(|command| Rc::clone(&command.executor));
        match executor {
            Some(executor) => executor(self, args),
            None => {
                log::debug!("{name:?} was removed before it could run");
                Ok(())
            }
        }
    }

    fn command_not_specified(&self) -> anyhow::Result<()> {
        self.events
            .emit_or_else(self, &Event::CommandNotSpecified, || {
                self.print(&format!(
                    "{} {}",
                    theme::error("error"),
                    theme::muted("command not specified")
                ));
            })
    }

    fn command_not_found(&self, name: &str, candidates: &[String]) -> anyhow::Result<()> {
        self.events.emit_or_else(
            self,
            &Event::CommandNotFound {
                name: name.to_string(),
            },
            || {
                self.print(&format!(
                    "{} {}",
                    theme::error("command not found:"),
                    theme::command(name)
                ));
            },
        )?;

        let suggestions = suggest(name, candidates);
        if suggestions.is_empty() {
            return Ok(());
        }

        let event = Event::DidYouMean {
            name: name.to_string(),
            suggestions: suggestions.clone(),
        };
        self.events.emit_or_else(self, &event, || {
            self.print(&theme::error("did you mean:"));
        })?;
        for suggestion in &suggestions {
            self.print(&format!(" {}", theme::command(suggestion)));
        }
        Ok(())
    }

    /// Print the help screen: options header, user commands, built-ins.
    pub fn help(&self) {
        let options = self.options();
        self.print(&theme::heading(&format!(
            "welcome to {} {}",
            options.name, options.version
        )));
        self.print(&theme::muted(&options.description));
        self.print(&format!(
            "{} {} {}",
            theme::muted("use the prefix"),
            theme::command(&options.prefix),
            theme::muted("for commands")
        ));

        self.print(&theme::heading("commands:"));
        let listing: Vec<(String, String)> = self
            .commands
            .borrow()
            .iter()
            .map(|c| (c.name.clone(), c.description.clone()))
            .collect();
        if listing.is_empty() {
            self.print(&theme::error(" no commands"));
        }
        for (name, description) in listing {
            self.print(&format!(" {} - {}", theme::command(&name), description));
        }

        self.print(&theme::heading("system commands:"));
        for builtin in Builtin::ALL {
            self.print(&format!(
                " {} - {}",
                theme::command(builtin.name()),
                builtin.description()
            ));
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.terminal.borrow_mut().clear_screen() {
            log::warn!("failed to clear the screen: {e}");
        }
    }

    /// Print the usage of a registered command. Suggestions only cover
    /// registered commands.
    pub fn usage(&self, command: &str) -> anyhow::Result<()> {
        if command.is_empty() {
            return self.command_not_specified();
        }

        let usage = self
            .commands
            .borrow()
            .get(command)
            .map(|c| Rc::clone(&c.usage));
        match usage {
            Some(usage) => {
                self.print(&usage());
                Ok(())
            }
            None => self.command_not_found(command, &self.command_names()),
        }
    }
}
