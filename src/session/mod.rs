//! The page capability set the scraper is written against.
//!
//! [`PageSession`] is everything product extraction needs from a browser:
//! navigate, find elements by CSS selector, and read or click them through
//! [`ElementHandle`]. The Firefox [`Tab`](crate::Tab) implements it for
//! real runs; tests use an in-memory page that re-renders like a live
//! dropdown widget.
//!
//! [`BrowserSession`] is the owner of such a page: whatever has to be
//! released once a run is over. The Firefox [`Window`](crate::Window)
//! implements it.
//!
//! Element handles are short-lived. A page re-render may invalidate any
//! handle, after which its methods return
//! [`Error::StaleElement`](crate::Error::StaleElement). Callers re-query
//! rather than hold handles across interactions.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// [`PageSession`] for the Firefox tab and element handles.
mod firefox;

#[cfg(test)]
pub(crate) mod fake;

// ============================================================================
// Traits
// ============================================================================

/// A reference to one element of the current document.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Rendered text of the element.
    async fn text(&self) -> Result<String>;

    /// Attribute value, `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Clicks the element.
    async fn click(&self) -> Result<()>;
}

/// A rendered document the scraper can drive.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Element handle type produced by lookups.
    type Element: ElementHandle;

    /// Loads `url` and waits for the page to finish loading.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Every element matching `selector`, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// The first element matching `selector`, or `None`.
    async fn find_first(&self, selector: &str) -> Result<Option<Self::Element>>;
}

/// Owns a page for the length of a run.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Page type the run scrapes with.
    type Page: PageSession;

    /// The page to drive.
    fn page(&self) -> Self::Page;

    /// Releases the session. Safe to call more than once.
    async fn close(&self) -> Result<()>;
}
