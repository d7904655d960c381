//! CLI interface for tourguide.
//!
//! Developer tooling around the tour engine. Each subcommand is
//! non-interactive: arguments in, plain or JSON output out.
//!
//! - `tourguide status|reset`: inspect or clear an origin's persisted state.
//! - `tourguide steps <path>`: print the step list a page would show.
//! - `tourguide replay <script>`: drive the engine through a scripted session.

mod format;
mod replay;

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use tourguide::Config;
use tourguide::model::{DeviceClass, Location, TourMode};
use tourguide::persistence::Persistence;
use tourguide::registry;
use tourguide::storage::{KeyValueStore, MemoryStore, SqliteStore};

use format::{format_progress, format_steps};

/// Default origin for the persisted store.
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Tourguide: inspect and replay the storefront onboarding tour.
#[derive(Debug, Parser)]
#[command(name = "tourguide", after_long_help = REPLAY_HELP)]
pub struct Cli {
    /// Origin whose persisted tour state to use.
    #[arg(long, global = true, default_value = DEFAULT_ORIGIN)]
    origin: String,

    #[command(subcommand)]
    pub command: Command,
}

const REPLAY_HELP: &str = r#"Replay scripts
  A replay script is JSON:

  {
    "start": "/",
    "viewport": { "width": 1280, "touch": false },
    "events": [
      { "event": "environment", "present": ["nav-search"], "items": ["/product/1"] },
      { "event": "wait", "ms": 900 },
      { "event": "next" },
      { "event": "navigate", "to": "/seller" },
      { "event": "skip" }
    ]
  }

  Other events: back, resize (with "viewport"), reset, unmount.
  Navigation requested by the tour is followed automatically."#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show whether the tour was completed and where the user last was.
    Status,

    /// Clear the persisted completion flag and progress.
    Reset,

    /// Print the steps a page shows.
    Steps {
        /// Page path, e.g. `/seller` or `/product/3`.
        path: String,

        /// Which step list to print.
        #[arg(long, value_enum, default_value_t = ModeArg::Normal)]
        mode: ModeArg,

        /// Use compact-device anchors and placements.
        #[arg(long)]
        compact: bool,
    },

    /// Drive the tour through a JSON script, printing one JSON line per event.
    Replay {
        /// Path to the script.
        script: PathBuf,

        /// Use the persisted store instead of a fresh in-memory one.
        #[arg(long)]
        persist: bool,
    },
}

/// CLI-facing tour mode, mapped to the domain `TourMode`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// The page's own steps.
    Normal,
    /// Steps for the add-product panel.
    AddItem,
    /// Steps for the orders tab.
    Orders,
    /// Generic steps.
    Fallback,
}

impl ModeArg {
    fn to_domain(self) -> TourMode {
        match self {
            Self::Normal => TourMode::Normal,
            Self::AddItem => TourMode::AddItem,
            Self::Orders => TourMode::OrdersManagement,
            Self::Fallback => TourMode::Fallback,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Status => cmd_status(config, &cli.origin),
        Command::Reset => cmd_reset(config, &cli.origin),
        Command::Steps {
            path,
            mode,
            compact,
        } => {
            cmd_steps(&path, mode, compact);
            Ok(())
        }
        Command::Replay { script, persist } => {
            if persist {
                cmd_replay(config, open_store(config, &cli.origin)?, &script)
            } else {
                cmd_replay(config, MemoryStore::new(), &script)
            }
        }
    }
}

fn open_store(config: &Config, origin: &str) -> Result<SqliteStore, String> {
    let path = config
        .store_path()
        .ok_or("could not determine home directory")?;
    SqliteStore::open(&path, origin)
        .map_err(|e| format!("failed to open store at {}: {e}", path.display()))
}

fn cmd_status(config: &Config, origin: &str) -> Result<(), String> {
    let persistence = Persistence::new(open_store(config, origin)?);
    let completed = persistence
        .try_load_completed()
        .map_err(|e| format!("failed to read completion flag: {e}"))?;
    let progress = persistence
        .try_load_progress()
        .map_err(|e| format!("failed to read progress: {e}"))?;

    println!("origin     {origin}");
    println!("completed  {completed}");
    println!("progress   {}", format_progress(progress.as_ref()));
    Ok(())
}

fn cmd_reset(config: &Config, origin: &str) -> Result<(), String> {
    let mut persistence = Persistence::new(open_store(config, origin)?);
    persistence
        .try_reset()
        .map_err(|e| format!("failed to reset tour state: {e}"))?;
    println!("Tour state cleared for {origin}");
    Ok(())
}

fn cmd_steps(path: &str, mode: ModeArg, compact: bool) {
    let page = Location::parse(path).page();
    let device = if compact {
        DeviceClass::Compact
    } else {
        DeviceClass::Standard
    };
    let steps = registry::steps(page, mode.to_domain(), device);
    if steps.is_empty() {
        println!("No {} steps for {page}", mode.to_domain());
        return;
    }
    print!("{}", format_steps(&steps));
}

fn cmd_replay<S: KeyValueStore>(config: &Config, store: S, script: &Path) -> Result<(), String> {
    let script = replay::Script::load(script).map_err(|e| e.to_string())?;
    let stdout = io::stdout();
    replay::replay(config, store, &script, &mut stdout.lock())
        .map(|_| ())
        .map_err(|e| e.to_string())
}
