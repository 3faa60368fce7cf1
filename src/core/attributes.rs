use crate::domain::model::{AttributeLine, Product};
use crate::domain::ports::OdooRpc;
use crate::utils::error::Result;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};

/// Unique attribute names used by any variant, in first-seen order.
pub fn variant_attribute_names(product: &Product) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for attribute in product.variants.iter().flat_map(|v| &v.attributes) {
        if !names.contains(&attribute.name.as_str()) {
            names.push(&attribute.name);
        }
    }
    names
}

/// Collapses `(attribute_id, value_id)` pairs into one line per attribute.
pub fn merge_attribute_lines(pairs: impl IntoIterator<Item = (i64, i64)>) -> Vec<AttributeLine> {
    let mut order: Vec<i64> = Vec::new();
    let mut values: HashMap<i64, BTreeSet<i64>> = HashMap::new();

    for (attribute_id, value_id) in pairs {
        values
            .entry(attribute_id)
            .or_insert_with(|| {
                order.push(attribute_id);
                BTreeSet::new()
            })
            .insert(value_id);
    }

    order
        .into_iter()
        .map(|attribute_id| AttributeLine {
            attribute_id,
            value_ids: values
                .remove(&attribute_id)
                .map(|ids| ids.into_iter().collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// Finds or creates Odoo attributes and attribute values by name, remembering
/// ids it has already seen so a product's variants don't repeat lookups.
pub struct AttributeResolver<'a, R: OdooRpc + ?Sized> {
    odoo: &'a R,
    attributes: HashMap<String, i64>,
    values: HashMap<(i64, String), i64>,
}

impl<'a, R: OdooRpc + ?Sized> AttributeResolver<'a, R> {
    pub fn new(odoo: &'a R) -> Self {
        Self {
            odoo,
            attributes: HashMap::new(),
            values: HashMap::new(),
        }
    }

    pub async fn resolve_attribute(&mut self, name: &str) -> Result<i64> {
        if let Some(id) = self.attributes.get(name) {
            return Ok(*id);
        }

        let existing = self
            .odoo
            .search("product.attribute", json!([["name", "=", name]]))
            .await?;
        let id = match existing.first() {
            Some(id) => *id,
            None => {
                tracing::debug!("Creating attribute '{}'", name);
                self.odoo
                    .create(
                        "product.attribute",
                        json!({"name": name, "create_variant": "always"}),
                    )
                    .await?
            }
        };

        self.attributes.insert(name.to_string(), id);
        Ok(id)
    }

    pub async fn resolve_value(&mut self, attribute_id: i64, value: &str) -> Result<i64> {
        let key = (attribute_id, value.to_string());
        if let Some(id) = self.values.get(&key) {
            return Ok(*id);
        }

        let existing = self
            .odoo
            .search(
                "product.attribute.value",
                json!([["name", "=", value], ["attribute_id", "=", attribute_id]]),
            )
            .await?;
        let id = match existing.first() {
            Some(id) => *id,
            None => {
                tracing::debug!("Creating value '{}' for attribute {}", value, attribute_id);
                self.odoo
                    .create(
                        "product.attribute.value",
                        json!({"name": value, "attribute_id": attribute_id}),
                    )
                    .await?
            }
        };

        self.values.insert(key, id);
        Ok(id)
    }

    /// Attribute lines for a new template: every variant attribute value,
    /// plus product-level attributes that no variant varies on.
    pub async fn build_attribute_lines(&mut self, product: &Product) -> Result<Vec<AttributeLine>> {
        let variant_names = variant_attribute_names(product);
        let mut pairs = Vec::new();

        let variant_attributes = product.variants.iter().flat_map(|v| &v.attributes);
        let fixed_attributes = product
            .attributes
            .iter()
            .filter(|a| !variant_names.contains(&a.name.as_str()));

        for attribute in variant_attributes.chain(fixed_attributes) {
            let attribute_id = self.resolve_attribute(&attribute.name).await?;
            let value_id = self.resolve_value(attribute_id, &attribute.value).await?;
            pairs.push((attribute_id, value_id));
        }

        Ok(merge_attribute_lines(pairs))
    }
}
