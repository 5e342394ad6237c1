//! One product page to one [`ProductRecord`].

use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::debug;
use url::Url;

use crate::config::{ScraperConfig, Selectors};
use crate::error::{Error, Result};
use crate::session::{ElementHandle, PageSession};

use super::fields;
use super::record::ProductRecord;
use super::variants::VariantEnumerator;

/// Scrapes WooCommerce product pages.
#[derive(Debug, Clone)]
pub struct ProductScraper {
    selectors: Selectors,
    variants: VariantEnumerator,
}

impl ProductScraper {
    /// Creates a scraper using the configured selectors and waits.
    #[must_use]
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            selectors: config.selectors.clone(),
            variants: VariantEnumerator::new(config),
        }
    }

    /// Loads `url` and reads the product.
    ///
    /// Scalar fields are read in the page's default state; variants last.
    ///
    /// # Errors
    ///
    /// Fails if navigation fails or a required field (collection, title,
    /// price, main image, description) is missing or unreadable. Variant
    /// failures never fail the page.
    pub async fn scrape<S: PageSession>(&self, session: &S, url: &Url) -> Result<ProductRecord> {
        let mut record = self.read_page(session, url).await?;
        record.variants = self.variants.enumerate(session, url).await;
        Ok(record)
    }

    /// Like [`scrape`](Self::scrape), bounded by `limit`.
    ///
    /// Loading the page and reading its fields must finish within `limit`.
    /// Variant enumeration gets whatever is left; when that runs out, the
    /// record keeps the variants captured so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the page fields are not read in time,
    /// otherwise as [`scrape`](Self::scrape).
    pub async fn scrape_within<S: PageSession>(
        &self,
        session: &S,
        url: &Url,
        limit: Duration,
    ) -> Result<ProductRecord> {
        let deadline = Instant::now() + limit;

        let mut record = timeout_at(deadline, self.read_page(session, url))
            .await
            .map_err(|_| {
                Error::timeout(
                    format!("loading {url}"),
                    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                )
            })??;
        record.variants = self.variants.enumerate_until(session, url, deadline).await;

        Ok(record)
    }

    /// Navigates and reads every field of the default state.
    async fn read_page<S: PageSession>(&self, session: &S, url: &Url) -> Result<ProductRecord> {
        let sel = &self.selectors;

        session.navigate(url.as_str()).await?;
        debug!(%url, "Page loaded");

        let collection = self.collection(session).await?;
        let title = required_text(session, &sel.title).await?;
        let price = fields::read_price(session, sel).await?;
        let main_image = fields::read_image(session, sel, url).await?;
        let images = fields::read_all_attributes(session, &sel.gallery_image, "src", url).await?;
        let description = required_text(session, &sel.description).await?;
        let description_images = fields::read_all_attributes(
            session,
            &sel.description_image,
            &sel.description_image_attribute,
            url,
        )
        .await?;

        Ok(ProductRecord {
            url: url.to_string(),
            title,
            collections: vec![collection],
            price,
            main_image: main_image.into(),
            images: images.into_iter().map(String::from).collect(),
            description_images: description_images.into_iter().map(String::from).collect(),
            description,
            variants: Vec::new(),
        })
    }

    /// Text of the last breadcrumb link.
    async fn collection<S: PageSession>(&self, session: &S) -> Result<String> {
        let selector = &self.selectors.breadcrumb;
        let crumb = session
            .find_all(selector)
            .await?
            .pop()
            .ok_or_else(|| Error::element_not_found(selector.as_str()))?;

        Ok(crumb.text().await?.trim().to_string())
    }
}

async fn required_text<S: PageSession>(session: &S, selector: &str) -> Result<String> {
    let element = session
        .find_first(selector)
        .await?
        .ok_or_else(|| Error::element_not_found(selector))?;

    Ok(element.text().await?.trim().to_string())
}

// ============================================================================
// Tests
// ============================================================================
