//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::clusters::ClustersArgs;
use crate::commands::show::ShowArgs;
use crate::commands::watch::WatchArgs;

/// Week grid calendar layout.
///
/// Lays out calendar events on an hourly grid: overlapping events sit in
/// side-by-side columns in the day view and in rotating stacks in the week
/// view.
#[derive(Debug, Parser)]
#[command(name = "wg", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the week (or one day) once.
    Show(ShowArgs),

    /// Keep rendering the week, rotating stacked events on a timer.
    Watch(WatchArgs),

    /// List overlap clusters and their rotation order.
    Clusters(ClustersArgs),
}
