//! Output records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One selectable variant of a product, as displayed after picking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Option label, trimmed.
    pub name: String,
    /// Price shown for this variant.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Absolute URL of the variant's representative image.
    pub image: String,
}

/// Everything scraped from one product page.
///
/// Scalar fields describe the page's default state, read before any
/// variant is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Page the record was scraped from.
    pub url: String,
    pub title: String,
    /// Collection names from the breadcrumb trail.
    pub collections: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub main_image: String,
    /// Every gallery image, in gallery order.
    pub images: Vec<String>,
    /// Images embedded in the description.
    pub description_images: Vec<String>,
    pub description: String,
    /// Variants in dropdown order; empty for simple products.
    pub variants: Vec<VariantRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let record = ProductRecord {
            url: "https://shop.test/product/chair".to_string(),
            title: "Chair".to_string(),
            collections: vec!["Chairs".to_string()],
            price: Decimal::from_str("1234.50").expect("decimal"),
            main_image: "https://shop.test/media/chair.jpg".to_string(),
            images: vec!["https://shop.test/media/chair.jpg".to_string()],
            description_images: Vec::new(),
            description: "Solid oak.".to_string(),
            variants: vec![VariantRecord {
                name: "Oak".to_string(),
                price: Decimal::from_str("0.99").expect("decimal"),
                image: "https://shop.test/media/oak.jpg".to_string(),
            }],
        };

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["price"], json!(1234.5));
        assert_eq!(value["variants"][0]["price"], json!(0.99));
        assert_eq!(value["collections"], json!(["Chairs"]));

        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 9);
    }
}
