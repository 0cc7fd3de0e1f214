use std::fmt;

/// Commands every REPL has. They shadow user commands with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Help,
    Clear,
    Exit,
    Usage,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [Builtin::Help, Builtin::Clear, Builtin::Exit, Builtin::Usage];

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Help => "help",
            Builtin::Clear => "clear",
            Builtin::Exit => "exit",
            Builtin::Usage => "usage",
        }
    }

    /// One-line description for `help`.
    pub fn description(&self) -> &'static str {
        match self {
            Builtin::Help => "show this help",
            Builtin::Clear => "clear the screen",
            Builtin::Exit => "exit the repl",
            Builtin::Usage => "show usage of the commands",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An input line split into command and arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Line does not start with the prefix
    Text,

    /// Nothing but the prefix before the first space
    Empty,

    Invocation { command: String, args: String },
}

/// Parse an input line against the command prefix.
///
/// Exactly one leading prefix is stripped and the rest is split on single
/// spaces. The first token is the command; the others are joined back
/// together with no separator, so `"!say hello there"` gives `say` and
/// `hellothere`.
pub fn parse_line(line: &str, prefix: &str) -> ParsedLine {
    let Some(rest) = line.strip_prefix(prefix) else {
        return ParsedLine::Text;
    };

    let mut tokens = rest.split(' ');
    let command = tokens.next().unwrap_or_default();
    if command.is_empty() {
        return ParsedLine::Empty;
    }

    ParsedLine::Invocation {
        command: command.to_string(),
        args: tokens.collect::<String>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(command: &str, args: &str) -> ParsedLine {
        ParsedLine::Invocation {
            command: command.to_string(),
            args: args.to_string(),
        }
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse_line("hello", "!"), ParsedLine::Text);
        assert_eq!(parse_line(" !help", "!"), ParsedLine::Text);
    }

    #[test]
    fn test_parse_command_without_args() {
        assert_eq!(parse_line("!help", "!"), invocation("help", ""));
    }

    #[test]
    fn test_parse_args_join_without_separator() {
        assert_eq!(
            parse_line("!say hello there", "!"),
            invocation("say", "hellothere")
        );
    }

    #[test]
    fn test_parse_repeated_spaces_are_dropped() {
        assert_eq!(parse_line("!say a  b", "!"), invocation("say", "ab"));
    }

    #[test]
    fn test_parse_prefix_only() {
        assert_eq!(parse_line("!", "!"), ParsedLine::Empty);
        assert_eq!(parse_line("! help", "!"), ParsedLine::Empty);
    }

    #[test]
    fn test_parse_strips_one_prefix() {
        assert_eq!(parse_line("!!help", "!"), invocation("!help", ""));
    }

    #[test]
    fn test_parse_multi_char_prefix() {
        assert_eq!(parse_line("::usage say", "::"), invocation("usage", "say"));
        assert_eq!(parse_line(":usage", "::"), ParsedLine::Text);
    }

    #[test]
    fn test_parse_empty_prefix_makes_every_line_a_command() {
        assert_eq!(parse_line("help", ""), invocation("help", ""));
        assert_eq!(parse_line("", ""), ParsedLine::Empty);
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(Builtin::from_name("help"), Some(Builtin::Help));
        assert_eq!(Builtin::from_name("usage"), Some(Builtin::Usage));
        assert_eq!(Builtin::from_name("Help"), None);
        assert_eq!(Builtin::Exit.to_string(), "exit");
    }
}
