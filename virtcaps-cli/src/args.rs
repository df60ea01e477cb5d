use std::env;
use text_colorizer::Colorize;

/// Subcommand to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Summarize a host capabilities document, optionally resolving a guest.
    Host {
        file: String,
        os_type: Option<String>,
        arch: Option<String>,
    },
    /// Summarize a domain capabilities document.
    Domain { file: String },
    /// Label firmware paths against a domain capabilities document.
    Firmware { file: String, path: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    pub command: Command,
    pub config: Option<String>,
}

impl Arguments {
    /// Parse from an argument list that excludes the program name.
    pub fn parse<I, S>(args: I) -> Result<Arguments, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positional = Vec::new();
        let mut os_type = None;
        let mut arch = None;
        let mut config = None;

        let mut iter = args.into_iter().map(Into::into);
        while let Some(arg) = iter.next() {
            if !arg.starts_with("--") {
                positional.push(arg);
                continue;
            }
            let slot = match arg.as_str() {
                "--os-type" => &mut os_type,
                "--arch" => &mut arch,
                "--config" => &mut config,
                flag => return Err(format!("unknown option {flag}")),
            };
            match iter.next() {
                Some(value) => *slot = Some(value),
                None => return Err(format!("{arg} needs a value")),
            }
        }

        let mut positional = positional.into_iter();
        let (Some(name), Some(file)) = (positional.next(), positional.next()) else {
            return Err("not enough arguments".to_string());
        };
        let extra = positional.next();

        let command = match name.as_str() {
            "host" => Command::Host { file, os_type, arch },
            "domain" => Command::Domain { file },
            "firmware" => Command::Firmware { file, path: extra },
            other => return Err(format!("unknown command {other}")),
        };
        Ok(Arguments { command, config })
    }
}

pub fn print_usage(error: &str) {
    eprintln!("{} - {}", "virtcaps".green(), error);
    eprintln!(
        "Usage: {} {} {} {}",
        "virtcaps".green(),
        "host".yellow(),
        "file".yellow(),
        "[--os-type T] [--arch A]".blue()
    );
    eprintln!(
        "       {} {} {}",
        "virtcaps".green(),
        "domain".yellow(),
        "file".yellow()
    );
    eprintln!(
        "       {} {} {} {}",
        "virtcaps".green(),
        "firmware".yellow(),
        "file".yellow(),
        "[path]".blue()
    );
    eprintln!("Options: {}", "--config virtcaps.toml".blue());
}

pub fn parse_args() -> Arguments {
    match Arguments::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            print_usage(&e);
            std::process::exit(2);
        }
    }
}
