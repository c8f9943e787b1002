use crate::browser::{BrowserLauncher, BrowserSession, PageElement};
use crate::error::Result;
use crate::query;
use crate::types::{Country, HarvestResult};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Pause after navigation before the first interaction.
    pub settle_delay: Duration,
    /// Scroll signals sent per burst.
    pub scroll_repetitions: usize,
    pub scroll_interval: Duration,
    pub media_class: String,
    pub url_attribute: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(1),
            scroll_repetitions: 100,
            scroll_interval: Duration::from_millis(200),
            media_class: "js-adaptive-photo".to_string(),
            url_attribute: "data-image-url".to_string(),
        }
    }
}

/// Collects media URLs for one country at a time, one browser session per country.
pub struct Harvester<L> {
    launcher: L,
    config: HarvestConfig,
}

impl<L: BrowserLauncher> Harvester<L> {
    pub fn new(launcher: L, config: HarvestConfig) -> Self {
        Self { launcher, config }
    }

    pub async fn harvest(&self, country: &Country, samples: usize) -> Result<HarvestResult> {
        info!("Getting urls for country {}", country.code);
        let url = query::search_url(country);

        let mut session = self.launcher.launch().await?;
        let outcome = self.collect(&mut session, &url, country, samples).await;

        // Teardown runs whatever happened above
        if let Err(e) = session.close().await {
            warn!("Failed to close browser session for {}: {}", country.code, e);
        }

        let (urls, stalled) = outcome?;
        debug!("Returning {} urls for {}", urls.len(), country.code);
        Ok(HarvestResult::new(country.clone(), urls, stalled))
    }

    async fn collect(
        &self,
        session: &mut L::Session,
        url: &str,
        country: &Country,
        samples: usize,
    ) -> Result<(Vec<String>, bool)> {
        debug!("Navigating to {}", url);
        session.navigate(url).await?;
        sleep(self.config.settle_delay).await;

        let mut elements = self.scroll_burst(session).await?;
        info!("Found {} items", elements.len());

        let mut stalled = false;
        let mut last_count = elements.len();
        while elements.len() < samples {
            elements = self.scroll_burst(session).await?;
            if elements.len() == last_count {
                warn!(
                    "Stuck at {} items for {}, keeping what we got",
                    elements.len(),
                    country.code
                );
                stalled = true;
                break;
            }
            last_count = elements.len();
            info!("Found {} items", elements.len());
        }

        let urls = self.extract_unique(&elements, samples).await?;
        Ok((urls, stalled))
    }

    async fn scroll_burst(
        &self,
        session: &mut L::Session,
    ) -> Result<Vec<<L::Session as BrowserSession>::Element>> {
        debug!("Sending {} scroll signals", self.config.scroll_repetitions);
        for _ in 0..self.config.scroll_repetitions {
            session.send_scroll_signal().await?;
            sleep(self.config.scroll_interval).await;
        }
        session.query_elements_by_class(&self.config.media_class).await
    }

    async fn extract_unique<E: PageElement>(
        &self,
        elements: &[E],
        samples: usize,
    ) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for element in elements {
            if let Some(url) = element.attribute(&self.config.url_attribute).await? {
                if seen.insert(url.clone()) {
                    unique.push(url);
                }
            }
        }
        info!("Found {} unique images", unique.len());
        unique.truncate(samples);
        Ok(unique)
    }
}
