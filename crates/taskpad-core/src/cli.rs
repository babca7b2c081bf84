use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use taskpad_shared::{Priority, View};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskpad",
    version,
    about = "Taskpad: a small task list with points, streaks and deadline reminders",
    disable_help_subcommand = true,
    infer_subcommands = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "taskpadrc", global = true)]
    pub taskpadrc: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[arg(
            short = 'p',
            long = "priority",
            default_value = "medium",
            value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<Priority>())
        )]
        priority: Priority,

        /// Deadline, e.g. 2026-10-19T17:30 or 2026-10-19.
        #[arg(short = 'd', long = "due")]
        due: Option<String>,
    },

    /// Show tasks in a view: all, today, upcoming, completed or dashboard.
    List {
        #[arg(value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<View>()))]
        view: Option<View>,

        #[arg(short = 's', long = "search")]
        search: Option<String>,
    },

    /// Show the dashboard summary.
    Dashboard,

    /// Toggle completion of a task by position or id prefix.
    #[command(visible_alias = "toggle")]
    Done { reference: String },

    /// Delete a task by position or id prefix.
    #[command(visible_alias = "rm")]
    Delete { reference: String },

    /// Show progress, points and streak.
    Stats,

    /// Remind about due tasks every interval until interrupted.
    Watch {
        #[arg(long = "once")]
        once: bool,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls positional `rc.KEY=VALUE` and `rc.KEY:VALUE` tokens out of the
/// argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((format!("rc.{k}"), v.to_string()))
            } else if let Some((k, v)) = rest.split_once(':') {
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                None
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::Parser;
    use taskpad_shared::{Priority, View};

    use super::{Command, GlobalCli, preprocess_args};

    fn args(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[test]
    fn positional_rc_tokens_become_overrides() {
        let pre = preprocess_args(&args(&[
            "taskpad",
            "rc.color=off",
            "list",
            "rc.default.view:today",
            "rc.nothing",
        ]))
        .expect("preprocess");

        assert_eq!(
            pre.rc_overrides,
            vec![
                ("rc.color".to_string(), "off".to_string()),
                ("rc.default.view".to_string(), "today".to_string()),
            ]
        );
        assert_eq!(pre.cleaned_args, args(&["taskpad", "list", "rc.nothing"]));
    }

    #[test]
    fn add_joins_words_and_parses_priority() {
        let cli = GlobalCli::parse_from(args(&[
            "taskpad", "add", "Buy", "milk", "-p", "HIGH", "--due", "2026-10-19",
        ]));
        assert_eq!(
            cli.command,
            Some(Command::Add {
                text: vec!["Buy".to_string(), "milk".to_string()],
                priority: Priority::High,
                due: Some("2026-10-19".to_string()),
            })
        );
    }

    #[test]
    fn abbreviations_and_aliases_resolve() {
        let cli = GlobalCli::parse_from(args(&["taskpad", "-vv", "li", "upcoming", "-s", "milk"]));
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::List {
                view: Some(View::Upcoming),
                search: Some("milk".to_string()),
            })
        );

        let cli = GlobalCli::parse_from(args(&["taskpad", "toggle", "2"]));
        assert_eq!(
            cli.command,
            Some(Command::Done {
                reference: "2".to_string()
            })
        );
    }

    #[test]
    fn unknown_view_is_rejected() {
        assert!(GlobalCli::try_parse_from(args(&["taskpad", "list", "someday"])).is_err());
    }

    #[test]
    fn no_command_is_allowed() {
        let cli = GlobalCli::parse_from(args(&["taskpad", "--rc", "color=off"]));
        assert_eq!(cli.command, None);
        assert_eq!(cli.rc_overrides[0].key, "color");
        assert_eq!(cli.rc_overrides[0].value, "off");
    }
}
