use crate::browser::{BrowserLauncher, BrowserSession, PageElement};
use crate::error::{Result, ScraperError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures_util::stream::StreamExt;
use log::debug;
use tokio::task::JoinHandle;

fn chromium_err(e: impl std::fmt::Display) -> ScraperError {
    ScraperError::BrowserError(e.to_string())
}

/// Launches Chromium through the DevTools protocol.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    headed: bool,
}

impl ChromiumLauncher {
    pub fn new(headed: bool) -> Self {
        Self { headed }
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession> {
        debug!("Starting chromium (headed={})", self.headed);
        let mut builder = BrowserConfig::builder().no_sandbox();
        if self.headed {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(chromium_err)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(chromium_err)?;

        // The handler must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(ChromiumSession {
            browser,
            handler_task,
            page: None,
            body: None,
        })
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Option<Page>,
    body: Option<Element>,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserError("no page loaded".to_string()))
    }
}

pub struct ChromiumElement(Element);

#[async_trait::async_trait]
impl PageElement for ChromiumElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.0.attribute(name).await.map_err(chromium_err)
    }
}

#[async_trait::async_trait]
impl BrowserSession for ChromiumSession {
    type Element = ChromiumElement;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        let page = self.browser.new_page(url).await.map_err(chromium_err)?;
        self.body = None;
        self.page = Some(page);
        Ok(())
    }

    async fn send_scroll_signal(&mut self) -> Result<()> {
        if self.body.is_none() {
            let body = self.page()?.find_element("body").await.map_err(chromium_err)?;
            self.body = Some(body);
        }
        if let Some(body) = &self.body {
            body.press_key("PageDown").await.map_err(chromium_err)?;
        }
        Ok(())
    }

    async fn query_elements_by_class(&mut self, class: &str) -> Result<Vec<ChromiumElement>> {
        let elements = self
            .page()?
            .find_elements(format!(".{}", class))
            .await
            .map_err(chromium_err)?;
        Ok(elements.into_iter().map(ChromiumElement).collect())
    }

    async fn close(&mut self) -> Result<()> {
        self.body = None;
        self.page = None;
        let closed = self.browser.close().await.map(|_| ()).map_err(chromium_err);
        if let Err(e) = self.browser.wait().await {
            debug!("Chromium process did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
        closed
    }
}
