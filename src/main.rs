use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use trade_grader::analytics::{Journal, JournalReport};
use trade_grader::config::Config;

fn main() -> Result<()> {
    let cfg = Config::from_env();
    cfg.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1) {
        Some(p) => p,
        None => bail!("usage: trade-grader <journal.json>"),
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading journal {}", path))?;
    let journal: Journal = serde_json::from_str(&raw)
        .with_context(|| format!("parsing journal {}", path))?;

    info!("Loaded {} trades from {}", journal.trades.len(), path);

    let report = JournalReport::build(&journal, &cfg, Utc::now());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
