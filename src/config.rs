//! REPL options.
//!
//! A fixed set of string options with defaults, a typed partial update
//! (`OptionsPatch`) and optional loading from a TOML file.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_NAME: &str = "creply";
const DEFAULT_HISTORY: &str = ".creply_history";
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Path of the append-only history log
    pub history: PathBuf,
    /// Leading text that marks a line as a command
    pub prefix: String,
    pub prompt: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: String::new(),
            history: PathBuf::from(DEFAULT_HISTORY),
            prefix: DEFAULT_PREFIX.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// Names of the options, for string-keyed access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionName {
    Name,
    Version,
    Description,
    History,
    Prefix,
    Prompt,
}

impl OptionName {
    pub const ALL: [OptionName; 6] = [
        OptionName::Name,
        OptionName::Version,
        OptionName::Description,
        OptionName::History,
        OptionName::Prefix,
        OptionName::Prompt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::Name => "name",
            OptionName::Version => "version",
            OptionName::Description => "description",
            OptionName::History => "history",
            OptionName::Prefix => "prefix",
            OptionName::Prompt => "prompt",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionName {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name.is_empty() {
            return Err(ConfigError::MissingOptionName);
        }
        OptionName::ALL
            .into_iter()
            .find(|option| option.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownOption {
                name: name.to_string(),
                valid: OptionName::ALL.map(|o| o.as_str()).join(", "),
            })
    }
}

impl Options {
    /// Read a single option as a string.
    pub fn value(&self, option: OptionName) -> String {
        match option {
            OptionName::Name => self.name.clone(),
            OptionName::Version => self.version.clone(),
            OptionName::Description => self.description.clone(),
            OptionName::History => self.history.display().to_string(),
            OptionName::Prefix => self.prefix.clone(),
            OptionName::Prompt => self.prompt.clone(),
        }
    }

    /// Apply every field present in `patch`.
    pub fn apply(&mut self, patch: OptionsPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(version) = patch.version {
            self.version = version;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(history) = patch.history {
            self.history = history;
        }
        if let Some(prefix) = patch.prefix {
            self.prefix = prefix;
        }
        if let Some(prompt) = patch.prompt {
            self.prompt = prompt;
        }
    }

    /// Parse options from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let patch = toml::from_str::<OptionsPatch>(contents)
            .map_err(|e| ConfigError::OptionsParse(e.to_string()))?;
        let mut options = Options::default();
        options.apply(patch);
        Ok(options)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::OptionsFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Partial update for `Options`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsPatch {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "historyFilePath", alias = "history_file_path")]
    pub history: Option<PathBuf>,
    #[serde(alias = "commandPrefix", alias = "command_prefix")]
    pub prefix: Option<String>,
    #[serde(alias = "promptString", alias = "prompt_string")]
    pub prompt: Option<String>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn history(mut self, history: impl Into<PathBuf>) -> Self {
        self.history = Some(history.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}
