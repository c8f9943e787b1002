mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use colored::*;
use geo_media_scraper::chromium::ChromiumLauncher;
use geo_media_scraper::report::write_report_csv;
use geo_media_scraper::types::{DownloadStatus, RunReport};
use geo_media_scraper::{
    ChunkedDownloader, DownloadConfig, HarvestConfig, Harvester, Orchestrator,
};
use log::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("Starting media scraper");

    let cli = Cli::parse();
    info!(
        "CLI arguments parsed: countries={:?} samples={} dry_run={}",
        cli.countries, cli.samples, cli.dry_run
    );

    let harvester = Harvester::new(ChromiumLauncher::new(cli.headed), HarvestConfig::default());
    let downloader = ChunkedDownloader::new(DownloadConfig::default())
        .context("Failed to build HTTP client")?;
    let orchestrator = Orchestrator::new(harvester, downloader);

    let report = match orchestrator
        .run(cli.countries.as_slice(), cli.samples, &cli.path, cli.dry_run)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", "Run failed".red());
            return Err(e.into());
        }
    };

    if let Some(path) = &cli.report {
        write_report_csv(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    if cli.dry_run {
        print_harvest(&report);
    } else {
        print_downloads(&report);
    }
    Ok(())
}

fn print_harvest(report: &RunReport) {
    for entry in report.entries() {
        let harvest = &entry.harvest;
        let label = format!("{} ({} urls)", harvest.country().code, harvest.len());
        if harvest.stalled() {
            println!("\n{} {}", label.bold(), "stalled".yellow());
        } else {
            println!("\n{}", label.bold());
        }
        for url in harvest.urls() {
            println!("  {}", url);
        }
    }
}

fn print_downloads(report: &RunReport) {
    println!("\n{}", "Download Summary:".bold());
    for entry in report.entries() {
        let code = &entry.harvest.country().code;
        let Some(summary) = &entry.downloads else {
            continue;
        };
        println!(
            "{}: {} harvested, {} downloaded, {} failed, {:.2} MB in {:.2?} ({} chunks)",
            code.bold(),
            entry.harvest.len(),
            summary.successful_downloads.to_string().green(),
            summary.failed_downloads.to_string().red(),
            summary.total_bytes_downloaded as f64 / 1_048_576.0,
            summary.total_duration,
            summary.chunks
        );

        for failed in summary
            .reports
            .iter()
            .filter(|r| r.status == DownloadStatus::Failed)
        {
            println!(
                "  ✗ {} ({} attempts): {}",
                failed.job.url.red(),
                failed.attempts,
                failed.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
