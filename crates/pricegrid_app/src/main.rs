mod app;
mod cli;
mod config;
mod effects;
mod input;
mod render;

use clap::Parser;
use pricegrid_logging::grid_info;

use crate::cli::Cli;
use crate::config::FileConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => config::load_file_config(path)?,
        None => FileConfig::default(),
    };
    let settings = config::resolve(&cli, file)?;
    pricegrid_logging::initialize(settings.log_destination(), settings.log_level);
    grid_info!(
        "Endpoint {} max_results={:?} timeout={:?}",
        settings.search.endpoint,
        settings.search.default_max_results,
        settings.search.request_timeout
    );

    app::run(settings, cli.one_shot_query())
}
