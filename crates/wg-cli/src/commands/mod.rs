//! CLI subcommand implementations.

pub mod clusters;
pub mod render;
pub mod show;
pub mod util;
pub mod watch;
