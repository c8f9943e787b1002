use crate::browser::BrowserLauncher;
use crate::country;
use crate::downloader::ChunkedDownloader;
use crate::error::Result;
use crate::harvester::Harvester;
use crate::types::RunReport;
use log::info;
use std::path::Path;

/// Drives harvest then download, one country at a time.
pub struct Orchestrator<L> {
    harvester: Harvester<L>,
    downloader: ChunkedDownloader,
}

impl<L: BrowserLauncher> Orchestrator<L> {
    pub fn new(harvester: Harvester<L>, downloader: ChunkedDownloader) -> Self {
        Self {
            harvester,
            downloader,
        }
    }

    /// Every code is resolved before the first browser opens; an unknown code
    /// aborts the run. A browser or folder/manifest failure also aborts, leaving
    /// the output of countries already finished untouched.
    pub async fn run<S: AsRef<str>>(
        &self,
        countries: &[S],
        samples: usize,
        root: &Path,
        dry_run: bool,
    ) -> Result<RunReport> {
        let resolved = country::resolve_all(countries)?;
        let mut report = RunReport::new();

        for country in resolved {
            let harvest = self.harvester.harvest(&country, samples).await?;

            let downloads = if dry_run {
                None
            } else {
                info!("Downloading images for country {}", country.code);
                let folder = root.join(&country.code);
                Some(self.downloader.fetch_all(&folder, harvest.urls()).await?)
            };

            report.record(harvest, downloads);
        }

        Ok(report)
    }
}
