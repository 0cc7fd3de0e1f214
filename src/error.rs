use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Misuse of the embedding API.
///
/// These are raised at the call site (subscription, option access) and are
/// fatal when they surface inside the running loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("the event name cannot be empty")]
    MissingEventName,

    #[error("the event {name} is not a valid event, valid events are -> {valid}")]
    UnknownEvent { name: String, valid: String },

    #[error("name of the option not specified")]
    MissingOptionName,

    #[error("the option {name} is not a valid option, valid options are -> {valid}")]
    UnknownOption { name: String, valid: String },

    #[error("cannot read options file {path}: {reason}")]
    OptionsFile { path: PathBuf, reason: String },

    #[error("invalid options: {0}")]
    OptionsParse(String),
}

/// Failures that keep the REPL from running at all.
#[derive(Error, Debug)]
pub enum ReplError {
    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),

    #[error("history file {path}: {source}")]
    History {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
