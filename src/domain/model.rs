use serde::{Deserialize, Deserializer, Serialize};

/// One page of the CatalogIQ `/products` listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub default_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main_image: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub default_code: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
}

/// An attribute with every value the template should carry for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLine {
    pub attribute_id: i64,
    pub value_ids: Vec<i64>,
}

impl AttributeLine {
    /// Odoo one2many "create" command wrapping a many2many "replace" command.
    pub fn to_command(&self) -> serde_json::Value {
        serde_json::json!([
            0,
            0,
            {
                "attribute_id": self.attribute_id,
                "value_ids": [[6, 0, self.value_ids]],
            }
        ])
    }
}

/// What loading a single product wrote to Odoo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub template_id: i64,
    pub variants_updated: usize,
    pub images_attached: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub offset: u64,
    pub products_fetched: usize,
    pub template_ids: Vec<i64>,
    pub variants_updated: usize,
    pub images_attached: usize,
    pub next_offset: Option<u64>,
}

/// Per-message results of a queue batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub reports: Vec<SyncReport>,
    pub failed_message_ids: Vec<String>,
}

// An exhausted catalog may answer with `"results": null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// CatalogIQ serves prices either as numbers or as decimal strings.
fn lenient_price<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Option::<Price>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Price::Number(n)) => Ok(Some(n)),
        Some(Price::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Price::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_defaults_for_missing_lists() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "name": "Plain Tee"
        }))
        .unwrap();

        assert_eq!(product.name, "Plain Tee");
        assert!(product.variants.is_empty());
        assert!(product.images.is_empty());
        assert!(product.price.is_none());
    }

    #[test]
    fn test_price_accepts_numbers_and_strings() {
        let numeric: Product =
            serde_json::from_value(serde_json::json!({"name": "A", "price": 12.5})).unwrap();
        let text: Product =
            serde_json::from_value(serde_json::json!({"name": "B", "price": " 19.99 "})).unwrap();
        let null: Product =
            serde_json::from_value(serde_json::json!({"name": "C", "price": null})).unwrap();

        assert_eq!(numeric.price, Some(12.5));
        assert_eq!(text.price, Some(19.99));
        assert_eq!(null.price, None);
    }

    #[test]
    fn test_price_rejects_garbage() {
        let result: serde_json::Result<Product> =
            serde_json::from_value(serde_json::json!({"name": "D", "price": "cheap"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_attribute_line_command_shape() {
        let line = AttributeLine {
            attribute_id: 3,
            value_ids: vec![7, 9],
        };
        assert_eq!(
            line.to_command(),
            serde_json::json!([0, 0, {"attribute_id": 3, "value_ids": [[6, 0, [7, 9]]]}])
        );
    }

    #[test]
    fn test_null_or_missing_results_is_an_empty_page() {
        let null: ProductPage = serde_json::from_str(r#"{"results": null}"#).unwrap();
        let missing: ProductPage = serde_json::from_str(r#"{"count": 0}"#).unwrap();

        assert!(null.results.is_empty());
        assert!(missing.results.is_empty());
    }
}
