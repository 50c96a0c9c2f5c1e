use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "crmb", about = concat!("crmboard v", env!("CARGO_PKG_VERSION"), " - CRM pipeline board in the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./crmboard.toml if present)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL, overriding [server] base_url
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// More logging (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive board over a snapshot file
    Board(BoardArgs),
    /// Print a snapshot's columns and cards
    Columns(ColumnsArgs),
    /// Move a record to another status on the server
    Move(MoveArgs),
    /// Fetch a record and print it as the detail panel shows it
    Show(ShowArgs),
    /// Print user suggestions for a mention query
    Users(UsersArgs),
}

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Board snapshot (JSON)
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// Board snapshot (JSON)
    pub file: PathBuf,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Record model, e.g. lead
    pub model: String,
    /// Record id
    pub id: String,
    /// Target status
    pub status: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record model, e.g. lead
    pub model: String,
    /// Record id
    pub id: String,
    /// Output the visible fields as a JSON object
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Text typed after the trigger
    pub query: String,
}
