use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::view::ViewId;

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

impl FromStr for KeyVal {
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

/// Which lists a command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSelection {
    All,
    One(ViewId),
}

impl ViewSelection {
    pub fn views(self) -> Vec<ViewId> {
        match self {
            ViewSelection::All => ViewId::ALL.to_vec(),
            ViewSelection::One(view) => vec![view],
        }
    }
}

impl FromStr for ViewSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ViewSelection::All);
        }
        Ok(ViewSelection::One(s.parse::<ViewId>()?))
    }
}

/// `VIEW:LABEL`; an empty label addresses the default bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseTarget {
    pub view: ViewId,
    pub category: Option<String>,
}

impl FromStr for CollapseTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (view, label) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected VIEW:CATEGORY, got: {s}"))?;
        Ok(Self {
            view: view.parse()?,
            category: (!label.is_empty()).then(|| label.to_string()),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tempo",
    version,
    about = "Tempo: category groups and collapse state for task lists",
    disable_help_subcommand = true
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

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print grouped task lists.
    Show(ShowArgs),
    /// Run a JSON script of collapse actions and queries.
    Replay(ReplayArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    #[arg(long)]
    pub tasks: Option<PathBuf>,

    #[arg(
        long,
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<ViewSelection>())
    )]
    pub view: Option<ViewSelection>,

    #[arg(
        long = "collapse",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<CollapseTarget>()),
        action = ArgAction::Append
    )]
    pub collapse: Vec<CollapseTarget>,

    #[arg(
        long = "collapse-all",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<ViewId>()),
        action = ArgAction::Append
    )]
    pub collapse_all: Vec<ViewId>,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    pub script: PathBuf,

    #[arg(long)]
    pub tasks: Option<PathBuf>,
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
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls `rc.KEY=VALUE` / `rc.KEY:VALUE` tokens out of the argument list.
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
            } else {
                rest.split_once(':')
                    .map(|(k, v)| (format!("rc.{k}"), v.to_string()))
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
