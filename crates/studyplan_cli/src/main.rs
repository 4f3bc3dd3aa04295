mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;
use studyplan_api::ApiResponse;
use studyplan_core::{open_db, ConfigOverrides, CoreConfig};

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let config = CoreConfig::resolve(ConfigOverrides {
        db_path: cli_opts.db.clone(),
        log_level: cli_opts.log_level.clone(),
        log_dir: cli_opts.log_dir.clone(),
    })
    .map_err(anyhow::Error::msg)?;

    if let Err(err) = studyplan_core::init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    if let Some(outcome) = cli::run_offline(&cli_opts.command) {
        return print_response(outcome?);
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;

    let response = cli::run(cli_opts.command, &conn)?;
    print_response(response)
}

fn print_response(response: ApiResponse) -> Result<()> {
    let rendered = response
        .json()
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| response.body.clone());
    if response.is_success() {
        println!("{rendered}");
        return Ok(());
    }
    warn!(
        "event=cli_command module=cli status=error http_status={}",
        response.status
    );
    bail!("request failed with status {}: {rendered}", response.status)
}
