use crossterm::style::Stylize;

/// Console diagnostic styles
///
/// Colours are cosmetic; callers only rely on the text.
pub fn error(text: &str) -> String {
    text.red().to_string()
}

pub fn command(text: &str) -> String {
    text.blue().to_string()
}

pub fn heading(text: &str) -> String {
    text.bold().to_string()
}

pub fn muted(text: &str) -> String {
    text.grey().to_string()
}

/// Remove ANSI CSI sequences (`ESC [ ... final`) from `text`.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_keep_text() {
        assert_eq!(strip_ansi(&error("command not found:")), "command not found:");
        assert_eq!(strip_ansi(&command("say")), "say");
        assert_eq!(strip_ansi(&heading("commands:")), "commands:");
    }

    #[test]
    fn test_strip_ansi_leaves_plain_text() {
        assert_eq!(strip_ansi("plain > text"), "plain > text");
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m and \x1b[1;34mblue\x1b[0m"), "red and blue");
    }
}
