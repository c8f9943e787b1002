use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Country codes to harvest, e.g. US IT FRA
    #[arg(short, long, num_args = 1.., required = true)]
    pub countries: Vec<String>,

    /// Number of media samples per country
    #[arg(short, long)]
    pub samples: usize,

    /// Print results only, do not download
    #[arg(short, long)]
    pub dry_run: bool,

    /// Root directory for downloaded files
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Also write harvested urls as CSV to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}
