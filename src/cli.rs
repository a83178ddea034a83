use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "aniview",
    version,
    about = "Browse an exported tracking list and see what to watch next"
)]
pub struct Cli {
    /// Path to the library export (JSON). Defaults to the user data directory.
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Browse without an account; watch actions render disabled.
    #[arg(long, global = true)]
    pub guest: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    List,
    Show { query: String },
    Tui,
}
