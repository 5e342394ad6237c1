//! In-memory product page for tests.
//!
//! The page answers the default [`Selectors`] and behaves like a WooCommerce
//! product page with a select2 variant dropdown:
//!
//! - Every click that re-renders the page (opening or closing the dropdown,
//!   picking an option) bumps a generation counter. Handles found under an
//!   older generation fail with [`Error::StaleElement`].
//! - The option list renders late: the first few option lookups after
//!   opening return nothing.
//! - Picking a variant swaps the displayed price and the first gallery
//!   image for the variant's own.

use std::fmt;
use std::future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{ScraperConfig, Selectors, Timing};
use crate::error::{Error, Result};
use crate::identifiers::ElementId;

use super::{BrowserSession, ElementHandle, PageSession};

/// Dropdown label shown before any variant is picked.
pub(crate) const PLACEHOLDER_LABEL: &str = "Choose an option";

/// Default selectors with waits short enough for tests.
pub(crate) fn fast_config() -> ScraperConfig {
    ScraperConfig {
        timing: Timing {
            poll_interval_ms: 1,
            options_settle_ms: 200,
            selection_settle_ms: 20,
            page_timeout_ms: 1_000,
        },
        ..ScraperConfig::default()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// One selectable variant.
#[derive(Debug, Clone)]
pub(crate) struct FakeVariant {
    pub label: String,
    pub sale_price: Option<String>,
    pub regular_price: Option<String>,
    pub image: String,
}

impl FakeVariant {
    pub(crate) fn new(label: &str, price: &str, image: &str) -> Self {
        Self {
            label: label.to_string(),
            sale_price: None,
            regular_price: Some(price.to_string()),
            image: image.to_string(),
        }
    }

    /// A variant whose page shows no price element at all.
    pub(crate) fn without_price(label: &str, image: &str) -> Self {
        Self {
            regular_price: None,
            ..Self::new(label, "", image)
        }
    }
}

/// Default-state contents of one product page.
#[derive(Debug, Clone)]
pub(crate) struct FakeProduct {
    pub breadcrumbs: Vec<String>,
    pub title: Option<String>,
    pub sale_price: Option<String>,
    pub regular_price: Option<String>,
    pub gallery: Vec<Option<String>>,
    pub active_slide: bool,
    pub description: Option<String>,
    pub description_images: Vec<Option<String>>,
    pub variants: Option<Vec<FakeVariant>>,
}

impl FakeProduct {
    /// A simple product: regular price, one gallery image, no variants.
    pub(crate) fn new(title: &str) -> Self {
        Self {
            breadcrumbs: vec!["Home".to_string(), "Chairs".to_string()],
            title: Some(title.to_string()),
            sale_price: None,
            regular_price: Some("$49.00".to_string()),
            gallery: vec![Some("/media/chair.jpg".to_string())],
            active_slide: false,
            description: Some("  Solid oak.\nSeats one.  ".to_string()),
            description_images: vec![Some("/media/detail.jpg".to_string())],
            variants: None,
        }
    }

    pub(crate) fn with_sale(mut self, price: &str) -> Self {
        self.sale_price = Some(price.to_string());
        self
    }

    pub(crate) fn with_regular(mut self, price: &str) -> Self {
        self.regular_price = Some(price.to_string());
        self
    }

    pub(crate) fn with_gallery(mut self, images: &[&str]) -> Self {
        self.gallery = images.iter().map(|src| Some((*src).to_string())).collect();
        self
    }

    pub(crate) fn with_active_slide(mut self) -> Self {
        self.active_slide = true;
        self
    }

    pub(crate) fn with_variants(mut self, variants: Vec<FakeVariant>) -> Self {
        self.variants = Some(variants);
        self
    }
}

// ============================================================================
// FakePage
// ============================================================================

#[derive(Default)]
struct PageState {
    product: Option<FakeProduct>,
    selected: Option<usize>,
    open: bool,
    option_lookups: usize,
    generation: u64,
}

impl PageState {
    fn rerender(&mut self) {
        self.generation += 1;
    }

    fn selected_variant(&self) -> Option<&FakeVariant> {
        let variants = self.product.as_ref()?.variants.as_ref()?;
        variants.get(self.selected?)
    }

    /// (sale, regular) price texts currently displayed.
    fn prices(&self) -> (Option<String>, Option<String>) {
        match (self.selected_variant(), &self.product) {
            (Some(variant), _) => (variant.sale_price.clone(), variant.regular_price.clone()),
            (None, Some(product)) => (product.sale_price.clone(), product.regular_price.clone()),
            (None, None) => (None, None),
        }
    }

    fn gallery(&self) -> Vec<Option<String>> {
        let Some(product) = &self.product else {
            return Vec::new();
        };
        let mut gallery = product.gallery.clone();
        if let (Some(variant), Some(first)) = (self.selected_variant(), gallery.first_mut()) {
            *first = Some(variant.image.clone());
        }
        gallery
    }
}

struct Shared {
    selectors: Selectors,
    pages: FxHashMap<String, FakeProduct>,
    failing: FxHashSet<String>,
    hanging: FxHashSet<String>,
    option_render_lag: usize,
    state: Mutex<PageState>,
    clicks: AtomicUsize,
    closes: AtomicUsize,
    visits: Mutex<Vec<String>>,
}

/// Scriptable product page implementing [`PageSession`].
#[derive(Clone)]
pub(crate) struct FakePage {
    pub selectors: Selectors,
    shared: Arc<Shared>,
}

impl FakePage {
    pub(crate) fn new() -> Self {
        let selectors = Selectors::default();
        Self {
            selectors: selectors.clone(),
            shared: Arc::new(Shared {
                selectors,
                pages: FxHashMap::default(),
                failing: FxHashSet::default(),
                hanging: FxHashSet::default(),
                option_render_lag: 1,
                state: Mutex::new(PageState::default()),
                clicks: AtomicUsize::new(0),
                closes: AtomicUsize::new(0),
                visits: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Builder methods mutate the shared state; call them before cloning.
    fn shared_mut(&mut self) -> &mut Shared {
        Arc::get_mut(&mut self.shared).unwrap_or_else(|| panic!("configure FakePage before cloning"))
    }

    pub(crate) fn with_product(mut self, url: &str, product: FakeProduct) -> Self {
        self.shared_mut().pages.insert(url.to_string(), product);
        self
    }

    /// Navigation to `url` fails like a DNS error.
    pub(crate) fn failing(mut self, url: &str) -> Self {
        self.shared_mut().failing.insert(url.to_string());
        self
    }

    /// Navigation to `url` never completes.
    pub(crate) fn hanging(mut self, url: &str) -> Self {
        self.shared_mut().hanging.insert(url.to_string());
        self
    }

    pub(crate) fn with_option_render_lag(mut self, lookups: usize) -> Self {
        self.shared_mut().option_render_lag = lookups;
        self
    }

    /// Total clicks on any element.
    pub(crate) fn clicks(&self) -> usize {
        self.shared.clicks.load(Ordering::SeqCst)
    }

    /// Times [`BrowserSession::close`] was called.
    pub(crate) fn closes(&self) -> usize {
        self.shared.closes.load(Ordering::SeqCst)
    }

    /// URLs passed to `navigate`, in order.
    pub(crate) fn visits(&self) -> Vec<String> {
        self.shared.visits.lock().clone()
    }

    fn element(&self, generation: u64, node: Node) -> FakeElement {
        FakeElement {
            shared: Arc::clone(&self.shared),
            generation,
            node,
        }
    }

    fn lookup(&self, selector: &str) -> Vec<FakeElement> {
        let sel = &self.shared.selectors;
        let mut state = self.shared.state.lock();
        let generation = state.generation;
        let Some(product) = state.product.clone() else {
            return Vec::new();
        };

        let texts = |items: Vec<String>| -> Vec<FakeElement> {
            items
                .into_iter()
                .map(|text| self.element(generation, Node::Text(text)))
                .collect()
        };
        let images = |srcs: Vec<Option<String>>, attribute: &str| -> Vec<FakeElement> {
            srcs.into_iter()
                .map(|value| {
                    self.element(
                        generation,
                        Node::Image {
                            attribute: attribute.to_string(),
                            value,
                        },
                    )
                })
                .collect()
        };

        if selector == sel.breadcrumb {
            texts(product.breadcrumbs)
        } else if selector == sel.title {
            texts(product.title.into_iter().collect())
        } else if selector == sel.sale_price {
            texts(state.prices().0.into_iter().collect())
        } else if selector == sel.price {
            let (sale, regular) = state.prices();
            texts(regular.into_iter().chain(sale).collect())
        } else if selector == sel.active_image {
            let active = if product.active_slide {
                state.gallery().into_iter().take(1).collect()
            } else {
                Vec::new()
            };
            images(active, "src")
        } else if selector == sel.gallery_image {
            images(state.gallery(), "src")
        } else if selector == sel.description {
            texts(product.description.into_iter().collect())
        } else if selector == sel.description_image {
            images(product.description_images, &sel.description_image_attribute)
        } else if selector == sel.variant_current {
            match product.variants {
                Some(_) => vec![self.element(generation, Node::Selection)],
                None => Vec::new(),
            }
        } else if selector == sel.variant_options {
            let count = product.variants.map_or(0, |v| v.len());
            if !state.open {
                return Vec::new();
            }
            state.option_lookups += 1;
            if state.option_lookups <= self.shared.option_render_lag {
                return Vec::new();
            }
            (0..count)
                .map(|index| self.element(generation, Node::Option(index)))
                .collect()
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl PageSession for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.shared.visits.lock().push(url.to_string());

        if self.shared.hanging.contains(url) {
            future::pending::<()>().await;
        }
        if self.shared.failing.contains(url) {
            return Err(Error::remote("unknown error", "net::ERR_NAME_NOT_RESOLVED"));
        }

        let product = self
            .shared
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::remote("unknown error", format!("404 for {url}")))?;

        let mut state = self.shared.state.lock();
        let generation = state.generation + 1;
        *state = PageState {
            product: Some(product),
            generation,
            ..PageState::default()
        };
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        Ok(self.lookup(selector))
    }

    async fn find_first(&self, selector: &str) -> Result<Option<FakeElement>> {
        Ok(self.lookup(selector).into_iter().next())
    }
}

#[async_trait]
impl BrowserSession for FakePage {
    type Page = Self;

    fn page(&self) -> Self {
        self.clone()
    }

    async fn close(&self) -> Result<()> {
        self.shared.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// FakeElement
// ============================================================================

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Image {
        attribute: String,
        value: Option<String>,
    },
    Selection,
    Option(usize),
}

/// Handle into a [`FakePage`]; stale once the page re-renders.
pub(crate) struct FakeElement {
    shared: Arc<Shared>,
    generation: u64,
    node: Node,
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeElement")
            .field("generation", &self.generation)
            .field("node", &self.node)
            .finish()
    }
}

impl FakeElement {
    fn live<'a>(&self, state: &'a mut PageState) -> Result<&'a mut PageState> {
        if state.generation == self.generation {
            Ok(state)
        } else {
            Err(Error::stale_element(ElementId::new(format!(
                "fake-{}-{:?}",
                self.generation, self.node
            ))))
        }
    }
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn text(&self) -> Result<String> {
        let mut guard = self.shared.state.lock();
        let state = self.live(&mut guard)?;

        Ok(match &self.node {
            Node::Text(text) => text.clone(),
            Node::Image { .. } => String::new(),
            Node::Selection => state
                .selected_variant()
                .map_or_else(|| PLACEHOLDER_LABEL.to_string(), |v| v.label.clone()),
            Node::Option(index) => state
                .product
                .as_ref()
                .and_then(|p| p.variants.as_ref())
                .and_then(|v| v.get(*index))
                .map(|v| format!("  {}\n", v.label))
                .unwrap_or_default(),
        })
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let mut guard = self.shared.state.lock();
        self.live(&mut guard)?;

        Ok(match &self.node {
            Node::Image { attribute, value } if attribute == name => value.clone(),
            _ => None,
        })
    }

    async fn click(&self) -> Result<()> {
        let mut guard = self.shared.state.lock();
        let state = self.live(&mut guard)?;
        self.shared.clicks.fetch_add(1, Ordering::SeqCst);

        match &self.node {
            Node::Selection => {
                state.open = !state.open;
                state.option_lookups = 0;
                state.rerender();
            }
            Node::Option(index) => {
                state.selected = Some(*index);
                state.open = false;
                state.rerender();
            }
            Node::Text(_) | Node::Image { .. } => {}
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://shop.test/product/chair";

    fn page() -> FakePage {
        FakePage::new().with_product(
            URL,
            FakeProduct::new("Chair").with_variants(vec![
                FakeVariant::new("Oak", "$49.00", "/media/oak.jpg"),
                FakeVariant::new("Walnut", "$59.00", "/media/walnut.jpg"),
            ]),
        )
    }

    #[tokio::test]
    async fn test_rerender_makes_handles_stale() {
        let page = page();
        page.navigate(URL).await.expect("navigate");

        let control = page
            .find_first(&page.selectors.variant_current)
            .await
            .expect("lookup")
            .expect("control");
        control.click().await.expect("open");

        let err = control.click().await.unwrap_err();
        assert!(matches!(err, Error::StaleElement { .. }));
    }

    #[tokio::test]
    async fn test_options_render_late() {
        let page = page();
        page.navigate(URL).await.expect("navigate");

        let control = page
            .find_first(&page.selectors.variant_current)
            .await
            .expect("lookup")
            .expect("control");
        control.click().await.expect("open");

        let options = &page.selectors.variant_options;
        assert!(page.find_all(options).await.expect("lookup").is_empty());
        assert_eq!(page.find_all(options).await.expect("lookup").len(), 2);
    }

    #[tokio::test]
    async fn test_selecting_swaps_price_and_image() {
        let page = page();
        page.navigate(URL).await.expect("navigate");

        let sel = page.selectors.clone();
        let control = page.find_first(&sel.variant_current).await.expect("lookup").expect("control");
        control.click().await.expect("open");
        let _ = page.find_all(&sel.variant_options).await;
        let options = page.find_all(&sel.variant_options).await.expect("options");
        options[1].click().await.expect("select");

        let price = page.find_first(&sel.price).await.expect("lookup").expect("price");
        assert_eq!(price.text().await.expect("text"), "$59.00");

        let image = page.find_first(&sel.gallery_image).await.expect("lookup").expect("image");
        assert_eq!(
            image.attribute("src").await.expect("attr").as_deref(),
            Some("/media/walnut.jpg")
        );
        assert_eq!(page.clicks(), 2);
    }

    #[tokio::test]
    async fn test_failing_navigation() {
        let page = FakePage::new().failing(URL);
        assert!(page.navigate(URL).await.is_err());
        assert_eq!(page.visits(), [URL]);
    }
}
