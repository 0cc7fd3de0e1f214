//! Line editing state for one prompt.
//!
//! Owns the text being typed, the cursor (a byte offset that always sits on
//! a grapheme boundary) and the recall buffer used by Up/Down.

use crate::events::{CursorPos, Key, KeyPress};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// What a key did to the line.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Enter was pressed; carries the finished line
    Submit(String),

    /// The line or cursor changed and needs redrawing
    Redraw,

    Ignored,
}

#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    recall: Option<usize>,
    draft: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh line with `history` (most recent first) for recall.
    pub fn begin(&mut self, history: Vec<String>) {
        self.buffer.clear();
        self.cursor = 0;
        self.history = history;
        self.recall = None;
        self.draft.clear();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor as a byte offset into `buffer`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn apply(&mut self, press: &KeyPress) -> EditOutcome {
        log::trace!("key {:?}", press);
        if press.ctrl {
            return match press.key {
                Key::Char('a') => self.move_to(0),
                Key::Char('e') => self.move_to(self.buffer.len()),
                Key::Char('u') => self.kill_to_start(),
                Key::Char('k') => self.kill_to_end(),
                _ => EditOutcome::Ignored,
            };
        }

        match press.key {
            Key::Enter => {
                self.cursor = 0;
                self.recall = None;
                EditOutcome::Submit(std::mem::take(&mut self.buffer))
            }
            Key::Char(c) if !press.meta => {
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                EditOutcome::Redraw
            }
            Key::Backspace => match self.prev_boundary() {
                Some(start) => {
                    self.buffer.replace_range(start..self.cursor, "");
                    self.cursor = start;
                    EditOutcome::Redraw
                }
                None => EditOutcome::Ignored,
            },
            Key::Delete => match self.next_boundary() {
                Some(end) => {
                    self.buffer.replace_range(self.cursor..end, "");
                    EditOutcome::Redraw
                }
                None => EditOutcome::Ignored,
            },
            Key::Left => match self.prev_boundary() {
                Some(start) => self.move_to(start),
                None => EditOutcome::Ignored,
            },
            Key::Right => match self.next_boundary() {
                Some(end) => self.move_to(end),
                None => EditOutcome::Ignored,
            },
            Key::Home => self.move_to(0),
            Key::End => self.move_to(self.buffer.len()),
            Key::Up => self.recall_older(),
            Key::Down => self.recall_newer(),
            _ => EditOutcome::Ignored,
        }
    }

    /// Display column of the cursor on a single unwrapped line.
    pub fn cursor_column(&self, prompt: &str) -> u16 {
        let width = prompt.width() + self.buffer[..self.cursor].width();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// Cursor position relative to the prompt start, wrapped at `columns`.
    pub fn cursor_pos(&self, prompt: &str, columns: u16) -> CursorPos {
        let width = prompt.width() + self.buffer[..self.cursor].width();
        let columns = usize::from(columns.max(1));
        CursorPos {
            cols: (width % columns) as u16,
            rows: u16::try_from(width / columns).unwrap_or(u16::MAX),
        }
    }

    fn move_to(&mut self, offset: usize) -> EditOutcome {
        if offset == self.cursor {
            return EditOutcome::Ignored;
        }
        self.cursor = offset;
        EditOutcome::Redraw
    }

    fn kill_to_start(&mut self) -> EditOutcome {
        if self.cursor == 0 {
            return EditOutcome::Ignored;
        }
        self.buffer.replace_range(..self.cursor, "");
        self.cursor = 0;
        EditOutcome::Redraw
    }

    fn kill_to_end(&mut self) -> EditOutcome {
        if self.cursor == self.buffer.len() {
            return EditOutcome::Ignored;
        }
        self.buffer.truncate(self.cursor);
        EditOutcome::Redraw
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(index, _)| index)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .graphemes(true)
            .next()
            .map(|grapheme| self.cursor + grapheme.len())
    }

    fn recall_older(&mut self) -> EditOutcome {
        let index = self.recall.map_or(0, |i| i + 1);
        let Some(entry) = self.history.get(index) else {
            return EditOutcome::Ignored;
        };
        if self.recall.is_none() {
            self.draft = self.buffer.clone();
        }
        self.buffer = entry.clone();
        self.cursor = self.buffer.len();
        self.recall = Some(index);
        EditOutcome::Redraw
    }

    fn recall_newer(&mut self) -> EditOutcome {
        match self.recall {
            None => return EditOutcome::Ignored,
            Some(0) => {
                self.buffer = std::mem::take(&mut self.draft);
                self.recall = None;
            }
            Some(i) => {
                self.buffer = self.history[i - 1].clone();
                self.recall = Some(i - 1);
            }
        }
        self.cursor = self.buffer.len();
        EditOutcome::Redraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(editor: &mut LineEditor, text: &str) {
        for c in text.chars() {
            editor.apply(&KeyPress::plain(Key::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "!help");
        assert_eq!(editor.buffer(), "!help");
        assert_eq!(
            editor.apply(&KeyPress::plain(Key::Enter)),
            EditOutcome::Submit("!help".to_string())
        );
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "ae\u{301}");
        editor.apply(&KeyPress::plain(Key::Backspace));
        assert_eq!(editor.buffer(), "a");
        editor.apply(&KeyPress::plain(Key::Backspace));
        assert_eq!(
            editor.apply(&KeyPress::plain(Key::Backspace)),
            EditOutcome::Ignored
        );
    }

    #[test]
    fn test_insert_in_the_middle() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "sy");
        editor.apply(&KeyPress::plain(Key::Left));
        type_text(&mut editor, "a");
        assert_eq!(editor.buffer(), "say");
        editor.apply(&KeyPress::plain(Key::Home));
        editor.apply(&KeyPress::plain(Key::Delete));
        assert_eq!(editor.buffer(), "ay");
    }

    #[test]
    fn test_ctrl_editing() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "hello world");
        editor.apply(&KeyPress::ctrl('a'));
        assert_eq!(editor.cursor(), 0);
        editor.apply(&KeyPress::ctrl('e'));
        assert_eq!(editor.cursor(), 11);
        for _ in 0..5 {
            editor.apply(&KeyPress::plain(Key::Left));
        }
        editor.apply(&KeyPress::ctrl('k'));
        assert_eq!(editor.buffer(), "hello ");
        editor.apply(&KeyPress::ctrl('u'));
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn test_history_recall_keeps_draft() {
        let mut editor = LineEditor::new();
        editor.begin(vec!["newest".to_string(), "oldest".to_string()]);
        type_text(&mut editor, "dra");

        editor.apply(&KeyPress::plain(Key::Up));
        assert_eq!(editor.buffer(), "newest");
        editor.apply(&KeyPress::plain(Key::Up));
        assert_eq!(editor.buffer(), "oldest");
        assert_eq!(
            editor.apply(&KeyPress::plain(Key::Up)),
            EditOutcome::Ignored
        );

        editor.apply(&KeyPress::plain(Key::Down));
        assert_eq!(editor.buffer(), "newest");
        editor.apply(&KeyPress::plain(Key::Down));
        assert_eq!(editor.buffer(), "dra");
        assert_eq!(
            editor.apply(&KeyPress::plain(Key::Down)),
            EditOutcome::Ignored
        );
    }

    #[test]
    fn test_ctrl_c_is_not_an_edit() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "x");
        assert_eq!(editor.apply(&KeyPress::ctrl('c')), EditOutcome::Ignored);
        assert_eq!(editor.buffer(), "x");
    }

    #[test]
    fn test_cursor_position_wraps() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "abcdef");
        assert_eq!(editor.cursor_column("> "), 8);
        assert_eq!(editor.cursor_pos("> ", 80), CursorPos { cols: 8, rows: 0 });
        assert_eq!(editor.cursor_pos("> ", 5), CursorPos { cols: 3, rows: 1 });
    }

    #[test]
    fn test_cursor_uses_display_width() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "日本");
        assert_eq!(editor.cursor_pos("", 80), CursorPos { cols: 4, rows: 0 });
    }
}
