use anyhow::Result;

use school_league::cli::Command;
use school_league::{
    handle_completions, handle_init_db, handle_recalculate, handle_refresh_levels, handle_refresh_ranks,
    handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::InitDb => handle_init_db(),
        Command::Recalculate => handle_recalculate(),
        Command::RefreshRanks => handle_refresh_ranks(),
        Command::RefreshLevels => handle_refresh_levels(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
