pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod fetchers;
pub mod http;
pub mod league;
pub mod rate_limiter;
pub mod scoring;
pub mod services;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;

use crate::api::RiotClient;
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::fetchers::PeakRankScraper;
use crate::services::server::ServerService;
use crate::services::{SweepReport, SweepService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init_db() -> Result<()> {
    let config = AppConfig::from_env();
    open_database(&config)?;
    println!("{} {}", "Schema ready at".green(), config.server.database_path);
    Ok(())
}

pub fn handle_recalculate() -> Result<()> {
    let config = AppConfig::from_env();
    let pool = open_database(&config)?;
    let report = SweepService::new(&pool, &config).recompute_all()?;
    print_report("Score recompute", &report);
    Ok(())
}

pub fn handle_refresh_ranks() -> Result<()> {
    let config = AppConfig::from_env();
    let pool = open_database(&config)?;
    let riot = RiotClient::new(&config.riot)?;
    let peaks = PeakRankScraper::new(&config.peak_rank)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(SweepService::new(&pool, &config).refresh_ranks_all(&riot, &peaks))?;
    print_report("Rank refresh", &report);
    Ok(())
}

pub fn handle_refresh_levels() -> Result<()> {
    let config = AppConfig::from_env();
    let pool = open_database(&config)?;
    let riot = RiotClient::new(&config.riot)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(SweepService::new(&pool, &config).refresh_levels_all(&riot))?;
    print_report("Level refresh", &report);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn open_database(config: &AppConfig) -> Result<DbPool> {
    let pool = database::create_pool(&config.server.database_path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&conn)?;
    Ok(pool)
}

fn print_report(label: &str, report: &SweepReport) {
    let summary = format!("{}: {}", label, report.summary());
    if report.failures.is_empty() {
        println!("{}", summary.green());
        return;
    }

    println!("{}", summary.yellow());
    for failure in &report.failures {
        println!("  {} player {}: {}", "x".red(), failure.player_id, failure.reason);
    }
}
