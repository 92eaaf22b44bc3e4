use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "pricegrid")]
#[command(version)]
#[command(about = "Compare live marketplace offers from the terminal", long_about = None)]
pub struct Cli {
    /// Search endpoint, e.g. http://localhost:5000/api/search
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// RON file with endpoint_url / max_results / request_timeout_secs / log_to_file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of offers to ask each marketplace for
    #[arg(long, value_name = "N")]
    pub max_results: Option<u32>,

    /// Give up on a search after this many seconds (default: wait indefinitely)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Also write logs to ./pricegrid.log
    #[arg(long)]
    pub log_file: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Run this query once and exit instead of reading queries from stdin
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    pub fn one_shot_query(&self) -> Option<String> {
        (!self.query.is_empty()).then(|| self.query.join(" "))
    }
}
