//! DOM element handles.
//!
//! An element is a reference into the content script's element map. The
//! reference dies when the node leaves the document; any call on it after
//! that fails with [`Error::StaleElement`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::{ElementId, FrameId, TabId};
use crate::protocol::{
    Command, ElementCommand, InputCommand, Request, STALE_ELEMENT_CODE,
};

use super::Window;

// ============================================================================
// Element
// ============================================================================

struct ElementInner {
    id: ElementId,
    tab_id: TabId,
    frame_id: FrameId,
    window: Window,
}

/// A handle to a DOM element.
#[derive(Clone)]
pub struct Element {
    inner: Arc<ElementInner>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("tab_id", &self.inner.tab_id)
            .field("frame_id", &self.inner.frame_id)
            .finish()
    }
}

impl Element {
    pub(crate) fn new(id: ElementId, tab_id: TabId, frame_id: FrameId, window: Window) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                id,
                tab_id,
                frame_id,
                window,
            }),
        }
    }

    /// Returns this element's ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.inner.id
    }
}

// ============================================================================
// Element - Reads
// ============================================================================

impl Element {
    /// Rendered text (`innerText`).
    ///
    /// Unlike `textContent` this skips hidden nodes and collapses
    /// whitespace the way the page displays it.
    pub async fn get_text(&self) -> Result<String> {
        let value = self.get_property("innerText").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Attribute value, `None` if the attribute is absent.
    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        let value = self
            .call_method("getAttribute", vec![Value::String(name.to_string())])
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    /// Reads `element[name]`.
    pub async fn get_property(&self, name: &str) -> Result<Value> {
        let command = Command::Element(ElementCommand::GetProperty {
            element_id: self.inner.id.clone(),
            name: name.to_string(),
        });

        let result = self.send_command(command).await?;
        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }

    /// Calls `element[name](...args)` and returns its result.
    pub async fn call_method(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        let command = Command::Element(ElementCommand::CallMethod {
            element_id: self.inner.id.clone(),
            name: name.to_string(),
            args,
        });

        let result = self.send_command(command).await?;
        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }
}

// ============================================================================
// Element - Input
// ============================================================================

impl Element {
    /// Left-clicks with a full pointer sequence (move, down, up, click).
    pub async fn click(&self) -> Result<()> {
        self.mouse_click(0).await
    }

    /// Clicks with the given button (0=left, 1=middle, 2=right).
    pub async fn mouse_click(&self, button: u8) -> Result<()> {
        debug!(element_id = %self.inner.id, button, "Clicking element");

        let command = Command::Input(InputCommand::MouseClick {
            element_id: self.inner.id.clone(),
            button,
        });

        self.send_command(command).await?;
        Ok(())
    }
}

// ============================================================================
// Element - Internal
// ============================================================================

impl Element {
    async fn send_command(&self, command: Command) -> Result<Value> {
        let request = Request::new(self.inner.tab_id, self.inner.frame_id, command);
        let response = self.inner.window.connection().send(request).await?;

        response.into_result().map_err(|e| match e {
            Error::Remote { code, .. } if code == STALE_ELEMENT_CODE => {
                Error::stale_element(self.inner.id.clone())
            }
            other => other,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn test_element_is_clone_and_debug() {
        fn assert_traits<T: Clone + std::fmt::Debug + Send + Sync>() {}
        assert_traits::<Element>();
    }
}
