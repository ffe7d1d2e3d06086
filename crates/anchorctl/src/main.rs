//! Solve overlay placements and replay overlay sessions from JSON scenes.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

mod scene;

use scene::Scene;

/// CLI flags for anchorctl.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Log placement decisions to stderr.
    #[clap(short, long)]
    verbose: bool,

    /// What to do.
    #[clap(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a single placement and print it.
    Place {
        /// Scene file.
        scene: PathBuf,
    },
    /// Replay the scene's steps against an overlay, printing state after each.
    Session {
        /// Scene file.
        scene: PathBuf,
    },
}

/// Read and parse a scene file.
fn load(path: &Path) -> Result<Scene> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing {}", path.display()))
}

/// Run anchorctl.
pub fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(io::stderr)
        .without_time()
        .init();

    let out = match &args.command {
        Command::Place { scene } => {
            let scene = load(scene)?;
            serde_json::to_string_pretty(&scene.place())?
        }
        Command::Session { scene } => {
            let mut scene = load(scene)?;
            if args.verbose {
                scene.config.debug = true;
            }
            serde_json::to_string_pretty(&scene.session()?)?
        }
    };
    println!("{out}");
    Ok(())
}
