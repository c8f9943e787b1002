use std::path::PathBuf;
use std::time::Duration;

/// A country code resolved against the ISO 3166 table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Unique media URLs collected for one country, capped at the requested sample size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestResult {
    country: Country,
    urls: Vec<String>,
    stalled: bool,
}

impl HarvestResult {
    pub fn new(country: Country, urls: Vec<String>, stalled: bool) -> Self {
        Self {
            country,
            urls,
            stalled,
        }
    }

    pub fn country(&self) -> &Country {
        &self.country
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// True when scrolling stopped producing new content before the sample size was reached.
    pub fn stalled(&self) -> bool {
        self.stalled
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub url: String,
    pub output_path: PathBuf,
}

#[derive(Debug)]
pub struct DownloadReport {
    pub job: DownloadJob,
    pub status: DownloadStatus,
    pub attempts: u32,
    pub bytes_downloaded: u64,
    pub duration: Duration,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum DownloadStatus {
    Success,
    Failed,
}

#[derive(Debug)]
pub struct DownloadSummary {
    pub total_downloads: usize,
    pub successful_downloads: usize,
    pub failed_downloads: usize,
    pub chunks: usize,
    pub total_bytes_downloaded: u64,
    pub total_duration: Duration,
    pub reports: Vec<DownloadReport>,
}

/// Outcome for a single country within a run.
#[derive(Debug)]
pub struct CountryRun {
    pub harvest: HarvestResult,
    /// `None` in dry-run mode.
    pub downloads: Option<DownloadSummary>,
}

/// Per-country results accumulated across a run, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<CountryRun>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, harvest: HarvestResult, downloads: Option<DownloadSummary>) {
        self.entries.push(CountryRun { harvest, downloads });
    }

    pub fn get(&self, code: &str) -> Option<&CountryRun> {
        self.entries
            .iter()
            .find(|entry| entry.harvest.country().code.eq_ignore_ascii_case(code))
    }

    pub fn entries(&self) -> &[CountryRun] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
