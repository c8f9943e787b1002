use crate::error::{Result, ScraperError};
use crate::retry::RetryPolicy;
use crate::types::{DownloadJob, DownloadReport, DownloadStatus, DownloadSummary};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::{sleep, timeout};

pub const MANIFEST_FILE: &str = "urls";

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Jobs run concurrently within a chunk; chunks run one after another.
    pub chunk_size: usize,
    /// Pause after every chunk, the last one included.
    pub cooldown: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            cooldown: Duration::from_secs(10),
            request_timeout: Duration::from_secs(3),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct ChunkedDownloader {
    client: reqwest::Client,
    config: DownloadConfig,
}

fn timed_out(url: &str, after: Duration) -> ScraperError {
    ScraperError::DownloadError(format!("No data within {:?} for URL: {}", after, url))
}

/// Split `items` into consecutive chunks of at most `size` elements.
pub fn plan_chunks<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}

/// Trailing path segment of a URL, without query or fragment.
pub fn file_name_for(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let path = without_fragment.split('?').next().unwrap_or(without_fragment);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

impl DownloadJob {
    pub fn new(url: &str, folder: &Path) -> Result<Self> {
        let name =
            file_name_for(url).ok_or_else(|| ScraperError::InvalidUrl(url.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            output_path: folder.join(name),
        })
    }
}

impl ChunkedDownloader {
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Write the manifest, then fetch every URL chunk by chunk into `country_folder`.
    ///
    /// Individual job failures are recorded in the summary; only folder and
    /// manifest I/O errors are returned as `Err`.
    pub async fn fetch_all(
        &self,
        country_folder: &Path,
        urls: &[String],
    ) -> Result<DownloadSummary> {
        tokio::fs::create_dir_all(country_folder).await?;
        let manifest = self.write_manifest(country_folder, urls).await?;
        debug!("Saved {} urls in {}", urls.len(), manifest.display());

        let start_time = Instant::now();
        let mut reports = Vec::with_capacity(urls.len());
        let jobs = self.create_download_jobs(urls, country_folder, &mut reports);

        let chunks = plan_chunks(&jobs, self.config.chunk_size);
        let pb = self.create_progress_bar(urls.len() as u64, country_folder);
        pb.inc(reports.len() as u64);

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                "Fetching chunk {}/{} ({} files)",
                index + 1,
                chunks.len(),
                chunk.len()
            );
            let handles: Vec<_> = chunk
                .iter()
                .cloned()
                .map(|job| self.download_job(job, &pb))
                .collect();

            // Barrier: every job of this chunk is terminal before the next starts
            let chunk_results = futures::future::join_all(handles).await;
            reports.extend(chunk_results);

            debug!("Sleeping {:?} to avoid throttling", self.config.cooldown);
            sleep(self.config.cooldown).await;
        }
        pb.finish_and_clear();

        let total_downloads = reports.len();
        let successful_downloads = reports
            .iter()
            .filter(|r| r.status == DownloadStatus::Success)
            .count();
        let failed_downloads = total_downloads - successful_downloads;
        let total_bytes_downloaded = reports.iter().map(|r| r.bytes_downloaded).sum();

        info!(
            "Finished {}: {} ok, {} failed",
            country_folder.display(),
            successful_downloads,
            failed_downloads
        );

        Ok(DownloadSummary {
            total_downloads,
            successful_downloads,
            failed_downloads,
            chunks: chunks.len(),
            total_bytes_downloaded,
            total_duration: start_time.elapsed(),
            reports,
        })
    }

    async fn write_manifest(&self, folder: &Path, urls: &[String]) -> Result<PathBuf> {
        let path = folder.join(MANIFEST_FILE);
        let mut contents = urls.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        let mut file = File::create(&path).await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        Ok(path)
    }

    /// Jobs whose URL has no usable file name are reported as failed right away.
    fn create_download_jobs(
        &self,
        urls: &[String],
        folder: &Path,
        failed: &mut Vec<DownloadReport>,
    ) -> Vec<DownloadJob> {
        let mut jobs = Vec::with_capacity(urls.len());
        let mut destinations = HashSet::new();

        for url in urls {
            match DownloadJob::new(url, folder) {
                Ok(job) => {
                    if !destinations.insert(job.output_path.clone()) {
                        warn!(
                            "{} shares its destination {} with another url, last write wins",
                            url,
                            job.output_path.display()
                        );
                    }
                    jobs.push(job);
                }
                Err(e) => {
                    error!("Skipping {}: {}", url, e);
                    failed.push(DownloadReport {
                        job: DownloadJob {
                            url: url.clone(),
                            output_path: folder.to_path_buf(),
                        },
                        status: DownloadStatus::Failed,
                        attempts: 0,
                        bytes_downloaded: 0,
                        duration: Duration::ZERO,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        jobs
    }

    async fn download_job(&self, job: DownloadJob, pb: &ProgressBar) -> DownloadReport {
        let start_time = Instant::now();
        debug!("Downloading {} to {}", job.url, job.output_path.display());

        let outcome = self.config.retry.run(|| self.fetch_once(&job)).await;

        let duration = start_time.elapsed();
        pb.inc(1);
        match outcome.result {
            Ok(bytes) => DownloadReport {
                job,
                status: DownloadStatus::Success,
                attempts: outcome.attempts,
                bytes_downloaded: bytes,
                duration,
                error: None,
            },
            Err(e) => {
                let error_msg = e.to_string();
                error!(
                    "Download failed for {} after {} attempts: {}",
                    job.url, outcome.attempts, error_msg
                );
                DownloadReport {
                    job,
                    status: DownloadStatus::Failed,
                    attempts: outcome.attempts,
                    bytes_downloaded: 0,
                    duration,
                    error: Some(error_msg),
                }
            }
        }
    }

    /// One GET streamed to disk as raw bytes.
    ///
    /// `request_timeout` bounds connecting, waiting for the response head,
    /// and each wait for the next body chunk, not the whole transfer.
    async fn fetch_once(&self, job: &DownloadJob) -> Result<u64> {
        let read_timeout = self.config.request_timeout;
        let resp = timeout(read_timeout, self.client.get(&job.url).send())
            .await
            .map_err(|_| timed_out(&job.url, read_timeout))??;

        if !resp.status().is_success() {
            return Err(ScraperError::DownloadError(format!(
                "HTTP error: {} for URL: {}",
                resp.status(),
                job.url
            )));
        }

        let mut file = File::create(&job.output_path).await?;
        let mut stream = resp.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = timeout(read_timeout, stream.next())
            .await
            .map_err(|_| timed_out(&job.url, read_timeout))?
        {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }

    fn create_progress_bar(&self, total: u64, folder: &Path) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] {msg} [{bar:40.cyan/blue}] {pos}/{len}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message(
            folder
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string(),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_chunks_count() {
        let urls: Vec<u32> = (0..250).collect();
        let chunks = plan_chunks(&urls, 100);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 50);

        assert_eq!(plan_chunks(&urls[..100], 100).len(), 1);
        assert_eq!(plan_chunks(&urls[..101], 100).len(), 2);
        assert!(plan_chunks::<u32>(&[], 100).is_empty());
    }

    #[test]
    fn test_plan_chunks_matches_ceil_division() {
        for k in 0..=350usize {
            let urls: Vec<usize> = (0..k).collect();
            assert_eq!(plan_chunks(&urls, 100).len(), (k + 99) / 100);
        }
    }

    #[test]
    fn test_file_name_for() {
        assert_eq!(
            file_name_for("https://pbs.twimg.com/media/DvXy1.jpg"),
            Some("DvXy1.jpg")
        );
        assert_eq!(
            file_name_for("https://pbs.twimg.com/media/DvXy1.jpg?name=large#top"),
            Some("DvXy1.jpg")
        );
        assert_eq!(file_name_for("https://pbs.twimg.com/media/"), None);
        assert_eq!(file_name_for(""), None);
    }

    #[test]
    fn test_job_destination_is_derived_from_url() {
        let folder = Path::new("/tmp/IT");
        let job = DownloadJob::new("https://a.example/x/photo.png", folder).unwrap();
        assert_eq!(job.output_path, folder.join("photo.png"));
        assert!(DownloadJob::new("https://a.example/x/", folder).is_err());
    }
}
