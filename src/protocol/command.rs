//! Command definitions organized by module.
//!
//! Commands follow the `module.methodName` naming used by the automation
//! extension. Only the commands a product page visit needs are modelled.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `browsingContext` | Navigate, current URL |
//! | `element` | Find, find all, read property, call method |
//! | `input` | Mouse click |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::ElementId;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// BrowsingContext module commands.
    BrowsingContext(BrowsingContextCommand),
    /// Element module commands.
    Element(ElementCommand),
    /// Input module commands.
    Input(InputCommand),
}

// ============================================================================
// BrowsingContext Commands
// ============================================================================

/// Navigation commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum BrowsingContextCommand {
    /// Navigate to URL and wait for the load event.
    #[serde(rename = "browsingContext.navigate")]
    Navigate {
        /// URL to navigate to.
        url: String,
    },

    /// Get current URL.
    #[serde(rename = "browsingContext.getUrl")]
    GetUrl,
}

// ============================================================================
// Element Commands
// ============================================================================

/// DOM lookup and generic property/method access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ElementCommand {
    /// Find the first element matching a CSS selector.
    #[serde(rename = "element.find")]
    Find {
        /// CSS selector.
        selector: String,
        /// Restrict the search to this element's subtree.
        #[serde(rename = "parentId", skip_serializing_if = "Option::is_none")]
        parent_id: Option<ElementId>,
    },

    /// Find every element matching a CSS selector, in document order.
    #[serde(rename = "element.findAll")]
    FindAll {
        /// CSS selector.
        selector: String,
        /// Restrict the search to this element's subtree.
        #[serde(rename = "parentId", skip_serializing_if = "Option::is_none")]
        parent_id: Option<ElementId>,
    },

    /// Read `element[name]`.
    #[serde(rename = "element.getProperty")]
    GetProperty {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Property name.
        name: String,
    },

    /// Call `element[name](...args)`.
    #[serde(rename = "element.callMethod")]
    CallMethod {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Method name.
        name: String,
        /// Method arguments.
        #[serde(default)]
        args: Vec<Value>,
    },
}

// ============================================================================
// Input Commands
// ============================================================================

/// Synthetic user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum InputCommand {
    /// Full mouse sequence on an element: move, down, up, click.
    ///
    /// Dropdown widgets commonly open on `mousedown`, which a bare
    /// `element.click()` never fires.
    #[serde(rename = "input.mouseClick")]
    MouseClick {
        /// Target element.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Mouse button (0=left, 1=middle, 2=right).
        #[serde(default)]
        button: u8,
    },
}

// ============================================================================
// Tests
// ============================================================================
