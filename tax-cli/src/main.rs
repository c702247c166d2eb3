use clap::Parser;
use tracing::{debug, info};

use tax_cli::config::{FileConfig, Settings};
use tax_cli::{Cli, app, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone();
    let file = match &config_path {
        Some(path) => FileConfig::from_path(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(cli, file);

    logging::init(settings.log_level.as_deref(), settings.log_file.as_deref())?;
    if let Some(path) = &config_path {
        info!(path = %path.display(), "Loaded config file");
    }
    debug!(?settings, "Resolved settings");

    let output = app::run(&settings)?;
    println!("{output}");

    Ok(())
}
