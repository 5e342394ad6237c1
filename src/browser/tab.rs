//! Tab handle: navigation and element lookup.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::{ElementId, FrameId, TabId};
use crate::protocol::{
    BrowsingContextCommand, Command, ElementCommand, NO_SUCH_ELEMENT_CODE, Request,
};

use super::{Element, Window};

// ============================================================================
// Tab
// ============================================================================

struct TabInner {
    tab_id: TabId,
    frame_id: FrameId,
    window: Window,
}

/// A handle to a browser tab in a specific frame.
#[derive(Clone)]
pub struct Tab {
    inner: Arc<TabInner>,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("tab_id", &self.inner.tab_id)
            .field("frame_id", &self.inner.frame_id)
            .field("session_id", &self.inner.window.session_id())
            .finish()
    }
}

impl Tab {
    pub(crate) fn new(tab_id: TabId, frame_id: FrameId, window: Window) -> Self {
        Self {
            inner: Arc::new(TabInner {
                tab_id,
                frame_id,
                window,
            }),
        }
    }

    /// Returns the tab ID.
    #[inline]
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Returns the frame ID.
    #[inline]
    #[must_use]
    pub fn frame_id(&self) -> FrameId {
        self.inner.frame_id
    }
}

// ============================================================================
// Tab - Navigation
// ============================================================================

impl Tab {
    /// Navigates and waits for the load event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the extension reports a navigation error.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, tab_id = %self.inner.tab_id, "Navigating");

        let command = Command::BrowsingContext(BrowsingContextCommand::Navigate {
            url: url.to_string(),
        });

        self.send_command(command).await?;
        Ok(())
    }

    /// Returns the URL currently loaded in the tab.
    pub async fn current_url(&self) -> Result<String> {
        let command = Command::BrowsingContext(BrowsingContextCommand::GetUrl);
        let result = self.send_command(command).await?;

        result
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::protocol("Expected url in getUrl response"))
    }
}

// ============================================================================
// Tab - Elements
// ============================================================================

impl Tab {
    /// Finds the first element matching `selector`.
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub async fn find_element(&self, selector: &str) -> Result<Option<Element>> {
        let command = Command::Element(ElementCommand::Find {
            selector: selector.to_string(),
            parent_id: None,
        });

        match self.send_command(command).await {
            Ok(result) => Ok(result
                .get("elementId")
                .and_then(Value::as_str)
                .map(|id| self.element(id))),
            Err(Error::Remote { code, .. }) if code == NO_SUCH_ELEMENT_CODE => {
                trace!(selector, "No element matched");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Finds every element matching `selector`, in document order.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<Element>> {
        let command = Command::Element(ElementCommand::FindAll {
            selector: selector.to_string(),
            parent_id: None,
        });

        let result = self.send_command(command).await?;

        let elements = result
            .get("elementIds")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(|id| self.element(id))
                    .collect()
            })
            .unwrap_or_default();

        Ok(elements)
    }

    fn element(&self, id: &str) -> Element {
        Element::new(
            ElementId::new(id),
            self.inner.tab_id,
            self.inner.frame_id,
            self.inner.window.clone(),
        )
    }

    async fn send_command(&self, command: Command) -> Result<Value> {
        let request = Request::new(self.inner.tab_id, self.inner.frame_id, command);
        self.inner
            .window
            .connection()
            .send(request)
            .await?
            .into_result()
    }
}

// ============================================================================
// Tests
// ============================================================================
