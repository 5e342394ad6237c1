//! Ordered selector fallbacks.
//!
//! Storefront themes render the same datum in different places: a sale
//! price only exists during a sale, and the active gallery slide only when
//! the carousel script has run. A [`Locator`] lists the alternatives in
//! preference order and takes the first that works.
//!
//! ```ignore
//! let price = Locator::new(".summary ins .amount")
//!     .or(".summary .amount")
//!     .read(session, |el| async move { parse_price(&el.text().await?) })
//!     .await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;

use tracing::trace;

use crate::error::{Error, Result};
use crate::session::PageSession;

// ============================================================================
// Locator
// ============================================================================

/// A preferred CSS selector followed by fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    candidates: Vec<String>,
}

impl Locator {
    /// Starts a locator with its preferred selector.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            candidates: vec![selector.into()],
        }
    }

    /// Appends a fallback selector.
    #[must_use]
    pub fn or(mut self, selector: impl Into<String>) -> Self {
        self.candidates.push(selector.into());
        self
    }

    /// Selectors in evaluation order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(String::as_str)
    }

    /// Returns the first element matched by any candidate.
    ///
    /// A lookup error on one candidate moves on to the next.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] listing every selector when none
    /// matches.
    pub async fn find<S: PageSession>(&self, session: &S) -> Result<S::Element> {
        for selector in self.candidates() {
            match session.find_first(selector).await {
                Ok(Some(element)) => return Ok(element),
                Ok(None) => trace!(selector, "Locator candidate missed"),
                Err(e) => trace!(selector, error = %e, "Locator candidate failed"),
            }
        }

        Err(self.not_found())
    }

    /// Applies `read` to the first candidate that both matches and reads
    /// successfully.
    ///
    /// # Errors
    ///
    /// Returns the last read error if some candidate matched but every read
    /// failed, otherwise [`Error::ElementNotFound`].
    pub async fn read<S, T, F, Fut>(&self, session: &S, read: F) -> Result<T>
    where
        S: PageSession,
        F: Fn(S::Element) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for selector in self.candidates() {
            let element = match session.find_first(selector).await {
                Ok(Some(element)) => element,
                Ok(None) => {
                    trace!(selector, "Locator candidate missed");
                    continue;
                }
                Err(e) => {
                    trace!(selector, error = %e, "Locator candidate failed");
                    continue;
                }
            };

            match read(element).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    trace!(selector, error = %e, "Locator read failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| self.not_found()))
    }

    fn not_found(&self) -> Error {
        Error::element_not_found(self.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.candidates.join(" | "))
    }
}

/// Returns the element matched by the first selector that matches.
///
/// # Errors
///
/// Returns [`Error::ElementNotFound`] when no selector matches, or
/// [`Error::Config`] for an empty selector list.
pub async fn try_locators<S: PageSession>(session: &S, selectors: &[&str]) -> Result<S::Element> {
    let Some((first, rest)) = selectors.split_first() else {
        return Err(Error::config("try_locators needs at least one selector"));
    };

    rest.iter()
        .fold(Locator::new(*first), |locator, selector| locator.or(*selector))
        .find(session)
        .await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::price::parse_price;
    use crate::session::ElementHandle;
    use crate::session::fake::{FakePage, FakeProduct};

    const URL: &str = "https://shop.test/product/chair";

    async fn page(product: FakeProduct) -> FakePage {
        let page = FakePage::new().with_product(URL, product);
        page.navigate(URL).await.expect("navigate");
        page
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let page = page(FakeProduct::new("Chair").with_sale("$39.00")).await;
        let selectors = &page.selectors;

        let element = Locator::new(&selectors.sale_price)
            .or(&selectors.price)
            .find(&page)
            .await
            .expect("found");

        assert_eq!(element.text().await.expect("text"), "$39.00");
    }

    #[tokio::test]
    async fn test_falls_back_on_miss() {
        let page = page(FakeProduct::new("Chair")).await;
        let selectors = &page.selectors;

        let element = try_locators(&page, &[selectors.sale_price.as_str(), selectors.price.as_str()])
            .await
            .expect("found");

        assert_eq!(element.text().await.expect("text"), "$49.00");
    }

    #[tokio::test]
    async fn test_all_miss_lists_every_selector() {
        let page = page(FakeProduct::new("Chair")).await;

        let err = Locator::new(".missing-a").or(".missing-b").find(&page).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Element not found: selector=.missing-a | .missing-b"
        );
    }

    #[tokio::test]
    async fn test_read_falls_through_on_read_error() {
        let page = page(FakeProduct::new("Chair").with_sale("Call us")).await;
        let selectors = &page.selectors;

        let price = Locator::new(&selectors.sale_price)
            .or(&selectors.price)
            .read(&page, |el| async move { parse_price(&el.text().await?) })
            .await
            .expect("fallback price");

        assert_eq!(price.to_string(), "49.00");
    }

    #[tokio::test]
    async fn test_read_reports_last_read_error() {
        let page = page(FakeProduct::new("Chair").with_regular("TBD")).await;
        let selectors = &page.selectors;

        let err = Locator::new(&selectors.sale_price)
            .or(&selectors.price)
            .read(&page, |el| async move { parse_price(&el.text().await?) })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PriceParse { .. }));
    }

    #[tokio::test]
    async fn test_empty_selector_list_is_rejected() {
        let page = page(FakeProduct::new("Chair")).await;
        assert!(matches!(
            try_locators(&page, &[]).await.unwrap_err(),
            Error::Config { .. }
        ));
    }
}
