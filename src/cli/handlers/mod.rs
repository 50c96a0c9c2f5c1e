use std::path::Path;

use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::api::{Backend, HttpBackend, StatusUpdate};
use crate::io::board_io::load_board;
use crate::io::config_io::load_config;
use crate::io::logging;
use crate::model::{CardRef, Config};
use crate::ops::detail::DetailFetcher;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let cwd = std::env::current_dir()?;
    let mut config = load_config(cli.config.as_deref(), &cwd)?;
    apply_overrides(&mut config, &cli);

    // The board owns the terminal, so its log goes to a file
    match &cli.command {
        Commands::Board(_) => logging::init_file(&config.log, cli.verbose),
        _ => logging::init_stderr(&config.log, cli.verbose),
    }
    debug!(base_url = %config.server.base_url, "config resolved");

    match cli.command {
        Commands::Board(args) => cmd_board(&args.file, &config),
        Commands::Columns(args) => cmd_columns(args),
        Commands::Move(args) => cmd_move(args, &config),
        Commands::Show(args) => cmd_show(args, &config),
        Commands::Users(args) => cmd_users(args, &config),
    }
}

/// Command-line flags win over the config file
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_board(file: &Path, config: &Config) -> CmdResult {
    crate::tui::run(file, config)
}

fn cmd_columns(args: ColumnsArgs) -> CmdResult {
    let board = load_board(&args.file)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&board_to_json(&board))?);
    } else {
        for line in format_columns(&board) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_move(args: MoveArgs, config: &Config) -> CmdResult {
    let backend = HttpBackend::new(&config.server)?;
    let update = StatusUpdate {
        model: args.model,
        id: args.id,
        status: args.status,
    };
    backend.update_status(&update)?;
    println!("{} {} -> {}", update.model, update.id, update.status);
    Ok(())
}

fn cmd_show(args: ShowArgs, config: &Config) -> CmdResult {
    let backend = HttpBackend::new(&config.server)?;
    let card = CardRef::new(args.model, args.id);
    let record = backend.fetch_record(&card)?;

    let mut fetcher = DetailFetcher::new(config.detail.private_prefix.clone());
    fetcher.render(&card, &record);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&detail_to_json(fetcher.panel()))?
        );
    } else {
        for line in format_detail(fetcher.panel()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_users(args: UsersArgs, config: &Config) -> CmdResult {
    let backend = HttpBackend::new(&config.server)?;
    for user in backend.suggest_users(&args.query)? {
        println!("{}", user);
    }
    Ok(())
}
