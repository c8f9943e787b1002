//! Harvest media links surfaced by a geo-filtered feed search and fetch the
//! assets into one folder per country.

pub mod browser;
pub mod chromium;
pub mod country;
pub mod downloader;
pub mod error;
pub mod harvester;
pub mod orchestrator;
pub mod query;
pub mod report;
pub mod retry;
pub mod types;

pub use downloader::{ChunkedDownloader, DownloadConfig};
pub use error::{Result, ScraperError};
pub use harvester::{HarvestConfig, Harvester};
pub use orchestrator::Orchestrator;
pub use types::{Country, HarvestResult, RunReport};
