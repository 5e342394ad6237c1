//! Field reads shared by the product and variant passes.

use rust_decimal::Decimal;
use tracing::debug;
use url::Url;

use crate::config::Selectors;
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::price::parse_price;
use crate::session::{ElementHandle, PageSession};

/// Price with fallback: sale price, else regular price.
pub(crate) async fn read_price<S: PageSession>(session: &S, selectors: &Selectors) -> Result<Decimal> {
    price_locator(selectors)
        .read(session, |el| async move { parse_price(&el.text().await?) })
        .await
}

/// Representative image with fallback: active slide, else first gallery image.
pub(crate) async fn read_image<S: PageSession>(
    session: &S,
    selectors: &Selectors,
    base: &Url,
) -> Result<Url> {
    let src = image_locator(selectors)
        .read(session, |el| async move { non_empty_attribute(&el, "src").await })
        .await?;

    resolve(base, &src)
}

/// `attribute` of every element matching `selector`, resolved against
/// `base`. Elements without the attribute are skipped.
pub(crate) async fn read_all_attributes<S: PageSession>(
    session: &S,
    selector: &str,
    attribute: &str,
    base: &Url,
) -> Result<Vec<Url>> {
    let mut urls = Vec::new();

    for element in session.find_all(selector).await? {
        let Some(raw) = element.attribute(attribute).await? else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }

        match resolve(base, &raw) {
            Ok(url) => urls.push(url),
            Err(e) => debug!(selector, raw = %raw, error = %e, "Skipping unresolvable image"),
        }
    }

    Ok(urls)
}

/// Resolves a possibly relative reference against the page URL.
pub(crate) fn resolve(base: &Url, raw: &str) -> Result<Url> {
    Ok(base.join(raw.trim())?)
}

// ============================================================================
// Display snapshot
// ============================================================================

/// Raw price text and image reference currently shown.
///
/// Compared before and after picking a variant to tell when the page has
/// caught up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Displayed {
    pub price: Option<String>,
    pub image: Option<String>,
}

impl Displayed {
    /// Reads the current display; unreadable parts are `None`.
    pub(crate) async fn capture<S: PageSession>(session: &S, selectors: &Selectors) -> Self {
        let price = price_locator(selectors)
            .read(session, |el| async move { el.text().await })
            .await
            .ok();
        let image = image_locator(selectors)
            .read(session, |el| async move { non_empty_attribute(&el, "src").await })
            .await
            .ok();

        Self { price, image }
    }
}

fn price_locator(selectors: &Selectors) -> Locator {
    Locator::new(&selectors.sale_price).or(&selectors.price)
}

fn image_locator(selectors: &Selectors) -> Locator {
    Locator::new(&selectors.active_image).or(&selectors.gallery_image)
}

async fn non_empty_attribute<E: ElementHandle>(element: &E, name: &str) -> Result<String> {
    match element.attribute(name).await? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::element_not_found(format!("img[{name}]"))),
    }
}

// ============================================================================
// Tests
// ============================================================================
