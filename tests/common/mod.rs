#![allow(dead_code)]

use geo_media_scraper::browser::{BrowserLauncher, BrowserSession, PageElement};
use geo_media_scraper::{HarvestConfig, Result, ScraperError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SCROLLS_PER_BURST: usize = 3;

/// Harvest settings with no waiting, so scripted pages run instantly.
pub fn instant_harvest_config() -> HarvestConfig {
    HarvestConfig {
        settle_delay: Duration::ZERO,
        scroll_repetitions: SCROLLS_PER_BURST,
        scroll_interval: Duration::ZERO,
        ..HarvestConfig::default()
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub launches: usize,
    pub closes: usize,
    pub navigations: Vec<String>,
    pub scrolls: usize,
    pub queries: usize,
}

/// A page whose media elements after burst `i` are `script[i]`; the last
/// snapshot repeats once the script runs out.
#[derive(Clone)]
pub struct FakeLauncher {
    script: Arc<Vec<Vec<String>>>,
    fail_navigation: bool,
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeLauncher {
    pub fn new(script: Vec<Vec<String>>) -> Self {
        Self {
            script: Arc::new(script),
            fail_navigation: false,
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    pub fn failing_navigation() -> Self {
        Self {
            fail_navigation: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn launches(&self) -> usize {
        self.state.lock().unwrap().launches
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    pub fn queries(&self) -> usize {
        self.state.lock().unwrap().queries
    }
}

/// `n` distinct URLs, `https://media.example/<prefix>/<i>.jpg`.
pub fn urls(prefix: &str, n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("https://media.example/{}/{}.jpg", prefix, i))
        .collect()
}

pub struct FakeSession {
    script: Arc<Vec<Vec<String>>>,
    fail_navigation: bool,
    state: Arc<Mutex<FakeState>>,
}

pub struct FakeElement(String);

#[async_trait::async_trait]
impl PageElement for FakeElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok((name == "data-image-url").then(|| self.0.clone()))
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession> {
        self.state.lock().unwrap().launches += 1;
        Ok(FakeSession {
            script: self.script.clone(),
            fail_navigation: self.fail_navigation,
            state: self.state.clone(),
        })
    }
}

#[async_trait::async_trait]
impl BrowserSession for FakeSession {
    type Element = FakeElement;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        if self.fail_navigation {
            return Err(ScraperError::BrowserError("net::ERR_NAME_NOT_RESOLVED".into()));
        }
        self.state.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn send_scroll_signal(&mut self) -> Result<()> {
        self.state.lock().unwrap().scrolls += 1;
        Ok(())
    }

    async fn query_elements_by_class(&mut self, class: &str) -> Result<Vec<FakeElement>> {
        assert_eq!(class, "js-adaptive-photo");
        let mut state = self.state.lock().unwrap();
        state.queries += 1;
        let bursts = state.scrolls / SCROLLS_PER_BURST;
        let snapshot = match self.script.len() {
            0 => Vec::new(),
            len => self.script[bursts.saturating_sub(1).min(len - 1)].clone(),
        };
        Ok(snapshot.into_iter().map(FakeElement).collect())
    }

    async fn close(&mut self) -> Result<()> {
        self.state.lock().unwrap().closes += 1;
        Ok(())
    }
}
