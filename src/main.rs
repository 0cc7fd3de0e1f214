use creply::{Event, EventKind, Options, OptionsPatch, Repl};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Optional first argument: a TOML options file
    let options = match std::env::args().nth(1) {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options {
            description: "a demo repl, try !say hello or !prompt $".to_string(),
            ..Options::default()
        },
    };

    let repl = Repl::new(options);

    repl.add_command(
        "say",
        "print something",
        |repl, args| {
            repl.print(args);
            Ok(())
        },
        || "say <something>".to_string(),
    );

    repl.add_command(
        "prompt",
        "change the prompt",
        |repl, args| {
            if args.is_empty() {
                anyhow::bail!("the prompt cannot be empty");
            }
            repl.set(OptionsPatch::new().prompt(format!("{args} ")));
            Ok(())
        },
        || "prompt <text>".to_string(),
    );

    repl.on(EventKind::Start, |repl, event| {
        if let Event::Start = event {
            repl.print(&format!("{} started, type !help", repl.options().name));
        }
        Ok(())
    });

    let code = repl.start()?;
    std::process::exit(code);
}
