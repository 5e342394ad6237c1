//! Scraper configuration.
//!
//! Every field has a default matching a stock WooCommerce storefront
//! using the select2 variation dropdown, so an empty JSON object is a
//! complete configuration:
//!
//! ```json
//! {
//!   "selectors": { "title": "h1.entry-title" },
//!   "timing": { "page_timeout_ms": 60000 }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::wait::WaitPolicy;

// ============================================================================
// ScraperConfig
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScraperConfig {
    /// CSS selectors for every extracted field.
    pub selectors: Selectors,
    /// Poll and timeout settings.
    pub timing: Timing,
}

impl ScraperConfig {
    /// Loads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the file cannot be read
    /// - [`Error::Config`] if it is not valid configuration
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        Self::from_json(&content).map_err(|e| match e {
            Error::Config { message } => Error::config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Parses and validates configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed JSON, unknown fields or
    /// invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that no selector is blank and no duration is zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.selectors.named() {
            if value.trim().is_empty() {
                return Err(Error::config(format!("selectors.{name} must not be empty")));
            }
        }

        for (name, value) in self.timing.named() {
            if value == 0 {
                return Err(Error::config(format!("timing.{name} must be greater than zero")));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// CSS selectors, one per page feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Selectors {
    /// Breadcrumb links; the last one is the product's collection.
    pub breadcrumb: String,
    /// Product title.
    pub title: String,
    /// Discounted price, present only during a sale.
    pub sale_price: String,
    /// Regular price.
    pub price: String,
    /// Image in the currently shown gallery slide.
    pub active_image: String,
    /// Every gallery image.
    pub gallery_image: String,
    /// Description panel.
    pub description: String,
    /// Images inside the description panel.
    pub description_image: String,
    /// Attribute holding a lazy-loaded description image's URL.
    pub description_image_attribute: String,
    /// Rendered "current selection" of the variant dropdown.
    pub variant_current: String,
    /// Options of the open variant dropdown.
    pub variant_options: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            breadcrumb: ".woocommerce-breadcrumb a".to_string(),
            title: ".product_title".to_string(),
            sale_price: ".summary ins .woocommerce-Price-amount".to_string(),
            price: ".summary .woocommerce-Price-amount".to_string(),
            active_image: ".woocommerce-product-gallery__image.flex-active-slide img".to_string(),
            gallery_image: ".woocommerce-product-gallery__image img".to_string(),
            description: ".woocommerce-Tabs-panel--description".to_string(),
            description_image: ".woocommerce-Tabs-panel--description img".to_string(),
            description_image_attribute: "data-src".to_string(),
            variant_current: ".select2-selection__rendered".to_string(),
            variant_options: ".select2-results li".to_string(),
        }
    }
}

impl Selectors {
    fn named(&self) -> [(&'static str, &str); 11] {
        [
            ("breadcrumb", &self.breadcrumb),
            ("title", &self.title),
            ("sale_price", &self.sale_price),
            ("price", &self.price),
            ("active_image", &self.active_image),
            ("gallery_image", &self.gallery_image),
            ("description", &self.description),
            ("description_image", &self.description_image),
            ("description_image_attribute", &self.description_image_attribute),
            ("variant_current", &self.variant_current),
            ("variant_options", &self.variant_options),
        ]
    }
}

// ============================================================================
// Timing
// ============================================================================

/// Bounds on every wait, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    /// Delay between two probes of a settle wait.
    pub poll_interval_ms: u64,
    /// How long the dropdown's option list may take to render.
    pub options_settle_ms: u64,
    /// How long price/image may take to change after picking a variant.
    pub selection_settle_ms: u64,
    /// Upper bound on scraping one page, variants included.
    pub page_timeout_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            options_settle_ms: 2_000,
            selection_settle_ms: 3_000,
            page_timeout_ms: 120_000,
        }
    }
}

impl Timing {
    /// Wait used while the option list renders.
    #[inline]
    #[must_use]
    pub fn options_wait(&self) -> WaitPolicy {
        WaitPolicy::from_millis(self.options_settle_ms, self.poll_interval_ms)
    }

    /// Wait used after picking a variant.
    #[inline]
    #[must_use]
    pub fn selection_wait(&self) -> WaitPolicy {
        WaitPolicy::from_millis(self.selection_settle_ms, self.poll_interval_ms)
    }

    /// Per-page timeout.
    #[inline]
    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    fn named(&self) -> [(&'static str, u64); 4] {
        [
            ("poll_interval_ms", self.poll_interval_ms),
            ("options_settle_ms", self.options_settle_ms),
            ("selection_settle_ms", self.selection_settle_ms),
            ("page_timeout_ms", self.page_timeout_ms),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================
