//! REPL (Read-Eval-Print Loop) module
//!
//! `Repl` is the embedding surface: register commands, subscribe to events,
//! adjust options and call `start()`.
//!
//! ## Module Structure
//!
//! - **dispatch.rs**: the loop state machine, line evaluation and built-ins
//! - **lifecycle.rs**: exit, uncaught failure and rejection handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use creply::{Options, Repl};
//!
//! let repl = Repl::new(Options::default());
//! repl.add_command(
//!     "say",
//!     "says something",
//!     |repl, args| {
//!         repl.print(args);
//!         Ok(())
//!     },
//!     || "say <something>".to_string(),
//! );
//! let code = repl.start().expect("terminal unavailable");
//! std::process::exit(code);
//! ```

mod dispatch;
mod lifecycle;

pub use lifecycle::RejectionHandle;

use crate::commands::{Command, CommandRegistry};
use crate::config::{OptionName, Options, OptionsPatch};
use crate::error::{ConfigError, ReplError};
use crate::events::{Event, EventBus, EventKind};
use crate::history::HistoryStore;
use crate::ui::{CrosstermTerminal, LineEditor, Terminal};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

pub struct Repl {
    options: RefCell<Options>,
    commands: RefCell<CommandRegistry>,
    events: EventBus<Repl>,
    editor: RefCell<LineEditor>,
    terminal: RefCell<Box<dyn Terminal>>,
    exit_request: Cell<Option<i32>>,
    rejections: Receiver<String>,
    rejection_tx: Sender<String>,
}

impl Repl {
    /// A REPL on the process's stdin/stdout.
    pub fn new(options: Options) -> Self {
        Self::with_terminal(options, CrosstermTerminal::new())
    }

    pub fn with_terminal(options: Options, terminal: impl Terminal + 'static) -> Self {
        let (rejection_tx, rejections) = mpsc::channel();
        Self {
            options: RefCell::new(options),
            commands: RefCell::new(CommandRegistry::new()),
            events: EventBus::new(),
            editor: RefCell::new(LineEditor::new()),
            terminal: RefCell::new(Box::new(terminal)),
            exit_request: Cell::new(None),
            rejections,
            rejection_tx,
        }
    }

    /// Register a command, replacing any command with the same name.
    pub fn add_command<E, U>(&self, name: &str, description: &str, executor: E, usage: U)
    where
        E: Fn(&Repl, &str) -> anyhow::Result<()> + 'static,
        U: Fn() -> String + 'static,
    {
        log::debug!("add command {name:?}");
        self.commands.borrow_mut().add(Command {
            name: name.to_string(),
            description: description.to_string(),
            usage: Rc::new(usage),
            executor: Rc::new(executor),
        });
    }

    pub fn remove_command(&self, name: &str) {
        if self.commands.borrow_mut().remove(name).is_some() {
            log::debug!("removed command {name:?}");
        }
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.borrow().has(name)
    }

    /// Registered command names in insertion order.
    pub fn command_names(&self) -> Vec<String> {
        self.commands.borrow().names()
    }

    /// Subscribe to an event.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&Repl, &Event) -> anyhow::Result<()> + 'static,
    {
        self.events.on(kind, listener);
    }

    /// Subscribe by event name ("command-not-found", ...).
    pub fn on_named<F>(&self, name: &str, listener: F) -> Result<(), ConfigError>
    where
        F: Fn(&Repl, &Event) -> anyhow::Result<()> + 'static,
    {
        self.events.on_named(name, listener)
    }

    /// Emit an event to its listeners, as the loop does.
    pub fn emit(&self, event: &Event) -> anyhow::Result<()> {
        self.events.emit(self, event)
    }

    /// Update options. A new prompt is drawn right away.
    pub fn set(&self, patch: OptionsPatch) {
        let prompt_changed = patch.prompt.is_some();
        self.options.borrow_mut().apply(patch);
        if prompt_changed {
            self.redisplay();
        }
    }

    pub fn get(&self, option: OptionName) -> String {
        self.options.borrow().value(option)
    }

    /// Read an option by name.
    pub fn get_named(&self, name: &str) -> Result<String, ConfigError> {
        let option = name.parse::<OptionName>()?;
        Ok(self.get(option))
    }

    pub fn options(&self) -> Options {
        self.options.borrow().clone()
    }

    /// Print a line through the terminal.
    pub fn print(&self, line: &str) {
        if let Err(e) = self.terminal.borrow_mut().print_line(line) {
            log::warn!("failed to print: {e}");
        }
    }

    /// Ask the loop to stop with `code` once the current line is done.
    pub fn exit(&self, code: i32) {
        log::debug!("exit requested with status {code}");
        self.exit_request.set(Some(code));
    }

    /// A sendable handle for reporting failures from background work.
    pub fn rejection_handle(&self) -> RejectionHandle {
        RejectionHandle::new(self.rejection_tx.clone())
    }

    /// Run the loop until `exit`, Ctrl-C or end of input. Returns the
    /// exit status.
    pub fn start(&self) -> Result<i32, ReplError> {
        // requests made before the loop runs do not carry over
        self.exit_request.set(None);
        self.terminal
            .borrow_mut()
            .activate()
            .map_err(ReplError::Terminal)?;

        let result = self.run();

        if let Err(e) = self.terminal.borrow_mut().deactivate() {
            log::warn!("failed to restore terminal: {e}");
        }
        result
    }

    fn history(&self) -> HistoryStore {
        HistoryStore::new(self.options.borrow().history.clone())
    }

    /// Redraw the prompt and the line being edited.
    fn redisplay(&self) {
        let prompt = self.options.borrow().prompt.clone();
        let (buffer, column) = {
            let editor = self.editor.borrow();
            (editor.buffer().to_string(), editor.cursor_column(&prompt))
        };
        if let Err(e) = self
            .terminal
            .borrow_mut()
            .render_input(&prompt, &buffer, column)
        {
            log::warn!("failed to draw prompt: {e}");
        }
    }
}
