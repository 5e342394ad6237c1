//! Product page extraction.
//!
//! [`ProductScraper`] reads one page's default state and hands the variant
//! dropdown to [`VariantEnumerator`].

mod fields;
mod product;
mod record;
mod variants;

pub use product::ProductScraper;
pub use record::{ProductRecord, VariantRecord};
pub use variants::{Phase, VariantEnumerator};
