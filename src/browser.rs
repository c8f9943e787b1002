//! The narrow browser capability the harvester drives.
//!
//! Anything that can navigate, scroll, and query elements by class can back
//! a harvest; [`crate::chromium`] is the production adapter.

use crate::error::Result;

/// A DOM element handle with attribute access.
#[async_trait::async_trait]
pub trait PageElement: Send + Sync {
    /// Read an attribute, `None` when the element does not carry it.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;
}

/// One live browser session. Sessions are never shared between countries.
#[async_trait::async_trait]
pub trait BrowserSession: Send {
    type Element: PageElement;

    /// Navigate to a URL
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Simulate a single page-down interaction on the page body
    async fn send_scroll_signal(&mut self) -> Result<()>;

    /// All elements currently carrying the given CSS class
    async fn query_elements_by_class(&mut self, class: &str) -> Result<Vec<Self::Element>>;

    /// Tear the session down
    async fn close(&mut self) -> Result<()>;
}

/// Opens fresh sessions.
#[async_trait::async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session>;
}
