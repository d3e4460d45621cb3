mod categorize;
mod config;
mod db;
mod import;
mod models;
mod period;
mod report;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    let settings = config::Settings::load_or_init(&data_dir.join("config.json"))?;
    let db_path = get_db_path(&data_dir);
    let mut db = db::Database::open(&db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db, &settings),
        2.. => run::as_cli(&args, &mut db, &settings),
        _ => {
            eprintln!("Usage: periodledger [command]");
            Ok(())
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("periodledger=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "periodledger", "PeriodLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

fn get_db_path(data_dir: &Path) -> PathBuf {
    match std::env::var_os("PERIODLEDGER_DB") {
        Some(path) => PathBuf::from(path),
        None => data_dir.join("periodledger.db"),
    }
}
