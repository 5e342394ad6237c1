//! Product scraper - WooCommerce product pages, variants included.
//!
//! Drives Firefox through an automation extension to each product page,
//! reads title, price, images and description, then walks the variant
//! dropdown option by option to record each variant's price and image.
//!
//! # Architecture
//!
//! - **Browser backend**: each [`Window`] owns a Firefox process and the
//!   WebSocket connection its extension dials into. The protocol uses
//!   `module.methodName` commands correlated by request ID.
//! - **[`PageSession`]**: the capability set extraction is written against
//!   (navigate, find, text, attribute, click). [`Tab`] implements it.
//! - **Extraction**: [`ProductScraper`] reads the default state of a page;
//!   [`VariantEnumerator`] re-queries the dropdown by index for every
//!   option, since the widget re-renders on each interaction.
//! - **Run**: [`Runner`] visits start URLs one at a time, isolates page
//!   failures, and pushes one batch to an [`OutputSink`].
//!
//! # Quick Start
//!
//! ```no_run
//! use product_scraper::{Driver, JsonSink, Result, Runner, ScraperConfig};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let driver = Driver::builder()
//!         .binary("/usr/bin/firefox")
//!         .extension("./extension.xpi")
//!         .build()?;
//!     let window = driver.window().headless().spawn().await?;
//!
//!     let config = ScraperConfig::default();
//!     let urls = vec![Url::parse("https://shop.example/product/chair")?];
//!     let mut sink = JsonSink::file("products.json");
//!
//!     Runner::new(&config).run_session(window, urls, &mut sink).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | Browser entities: [`Window`], [`Tab`], [`Element`] |
//! | [`driver`] | Driver factory and Firefox configuration |
//! | [`session`] | [`BrowserSession`], [`PageSession`] and [`ElementHandle`] traits |
//! | [`scrape`] | Product and variant extraction |
//! | [`runner`] | Request queue and run loop |
//! | [`config`] | Selectors and timing |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | WebSocket message types (internal) |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Browser entities: Window, Tab, Element.
pub mod browser;

/// Scraper configuration: selectors and timing.
pub mod config;

/// Driver factory and configuration.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for browser entities.
pub mod identifiers;

/// Run input document.
pub mod input;

/// Ordered selector fallbacks.
pub mod locator;

/// Currency text to decimal.
pub mod price;

/// WebSocket protocol message types.
pub mod protocol;

/// Request queue and run loop.
pub mod runner;

/// Product page extraction.
pub mod scrape;

/// Page capability traits.
pub mod session;

/// Output sinks.
pub mod sink;

/// WebSocket transport layer.
pub mod transport;

/// Bounded polling.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Element, Tab, Window, WindowBuilder};

// Driver types
pub use driver::{Driver, DriverBuilder, ExtensionSource, FirefoxOptions, Profile};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, FrameId, RequestId, SessionId, TabId};

// Scraping
pub use config::{ScraperConfig, Selectors, Timing};
pub use input::{RunInput, StartUrl};
pub use locator::{Locator, try_locators};
pub use price::parse_price;
pub use runner::{RequestQueue, RunSummary, Runner};
pub use scrape::{ProductRecord, ProductScraper, VariantEnumerator, VariantRecord};
pub use session::{BrowserSession, ElementHandle, PageSession};
pub use sink::{JsonSink, MemorySink, OutputSink};
pub use wait::{Settle, WaitPolicy, poll_until};
