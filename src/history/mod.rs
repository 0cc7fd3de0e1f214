//! Append-only history log.
//!
//! The file is chronological; `load` hands back the recall order the line
//! editor wants (most recent first, no blank lines).

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file empty if it does not exist yet.
    pub fn ensure_exists(&self) -> io::Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map(|_| ())
    }

    /// Read the whole file and return the recall buffer.
    pub fn load(&self) -> io::Result<Vec<String>> {
        self.ensure_exists()?;
        let contents = fs::read_to_string(&self.path)?;
        Ok(recall_order(&contents))
    }

    /// Append one line as its own write, preceded by a newline.
    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("\n{line}").as_bytes())
    }
}

/// Split file contents into lines, newest first, dropping empty ones.
pub fn recall_order(contents: &str) -> Vec<String> {
    contents
        .lines()
        .rev()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_recall_order_reverses_and_drops_empty() {
        assert_eq!(recall_order("a\nb\n"), vec!["b", "a"]);
        assert_eq!(recall_order("\nfirst\n\nsecond"), vec!["second", "first"]);
        assert!(recall_order("").is_empty());
    }

    #[test]
    fn test_recall_order_handles_crlf() {
        assert_eq!(recall_order("one\r\ntwo\r\n"), vec!["two", "one"]);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let store = HistoryStore::new(dir.path().join("history"));
        assert!(store.load().unwrap().is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_append_writes_newline_then_line() {
        let dir = TempDir::new().expect("temp dir");
        let store = HistoryStore::new(dir.path().join("history"));
        store.append("x").unwrap();
        store.append("!say hi").unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "\nx\n!say hi");
        assert_eq!(store.load().unwrap(), vec!["!say hi", "x"]);
    }

    #[test]
    fn test_load_from_existing_contents() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("history");
        fs::write(&path, "a\nb\n").unwrap();
        assert_eq!(HistoryStore::new(path).load().unwrap(), vec!["b", "a"]);
    }
}
