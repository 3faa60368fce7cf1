//! In-memory stand-ins for the ports, shared by the core unit tests.

use crate::domain::model::{Product, ProductPage};
use crate::domain::ports::{CatalogSource, ConfigProvider, ImageFetcher, OdooRpc, OffsetPublisher};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct OdooState {
    next_id: i64,
    tables: HashMap<String, Vec<(i64, Value)>>,
    calls: Vec<(String, String, Value)>,
}

impl OdooState {
    fn insert(&mut self, model: &str, mut values: Value) -> i64 {
        self.next_id += 1;
        let id = self.next_id;
        values["id"] = json!(id);
        self.tables
            .entry(model.to_string())
            .or_default()
            .push((id, values));
        id
    }

    // Mirrors Odoo: every attribute line value gets a template attribute
    // value, and one variant exists per combination of them.
    fn expand_template(&mut self, template_id: i64, values: &Value) {
        let mut groups: Vec<Vec<i64>> = Vec::new();
        for command in values["attribute_line_ids"].as_array().into_iter().flatten() {
            let line = &command[2];
            let attribute_id = line["attribute_id"].clone();
            let mut group = Vec::new();
            for value_id in line["value_ids"][0][2].as_array().into_iter().flatten() {
                group.push(self.insert(
                    "product.template.attribute.value",
                    json!({
                        "product_tmpl_id": template_id,
                        "attribute_id": attribute_id,
                        "product_attribute_value_id": value_id,
                    }),
                ));
            }
            groups.push(group);
        }

        let mut combinations: Vec<Vec<i64>> = vec![vec![]];
        for group in groups {
            combinations = combinations
                .into_iter()
                .flat_map(|combo| {
                    group.iter().map(move |id| {
                        let mut next = combo.clone();
                        next.push(*id);
                        next
                    })
                })
                .collect();
        }

        for ptav_ids in combinations {
            self.insert(
                "product.product",
                json!({
                    "product_tmpl_id": template_id,
                    "product_template_attribute_value_ids": ptav_ids,
                }),
            );
        }
    }
}

fn satisfies(record: &Value, condition: &Value) -> bool {
    let field = condition[0].as_str().unwrap_or_default();
    let expected = &condition[2];
    let actual = &record[field];
    match condition[1].as_str() {
        Some("=") => actual == expected,
        Some("in") => {
            let wanted: Vec<&Value> = expected.as_array().map(|v| v.iter().collect()).unwrap_or_default();
            match actual {
                Value::Array(items) => items.iter().any(|i| wanted.contains(&i)),
                scalar => wanted.contains(&scalar),
            }
        }
        _ => false,
    }
}

/// A tiny Odoo: search, create and write over in-memory tables.
#[derive(Default)]
pub struct FakeOdoo {
    state: Mutex<OdooState>,
    failing: Mutex<HashSet<(String, String)>>,
}

impl FakeOdoo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, model: &str, values: Value) -> i64 {
        self.state.lock().unwrap().insert(model, values)
    }

    pub fn fail_on(&self, model: &str, method: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert((model.to_string(), method.to_string()));
    }

    pub fn records(&self, model: &str) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .get(model)
            .map(|rows| rows.iter().map(|(_, v)| v.clone()).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, model: &str) -> usize {
        self.records(model).len()
    }

    pub fn calls_to(&self, model: &str, method: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .calls
            .iter()
            .filter(|(m, op, _)| m == model && op == method)
            .count()
    }
}

#[async_trait]
impl OdooRpc for FakeOdoo {
    async fn execute_kw(&self, model: &str, method: &str, args: Value) -> Result<Value> {
        if self
            .failing
            .lock()
            .unwrap()
            .contains(&(model.to_string(), method.to_string()))
        {
            return Err(SyncError::RpcError {
                model: model.to_string(),
                method: method.to_string(),
                message: "injected failure".to_string(),
            });
        }

        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push((model.to_string(), method.to_string(), args.clone()));

        match method {
            "search" => {
                let domain = args[0].as_array().cloned().unwrap_or_default();
                let ids: Vec<i64> = state
                    .tables
                    .get(model)
                    .into_iter()
                    .flatten()
                    .filter(|(_, record)| domain.iter().all(|c| satisfies(record, c)))
                    .map(|(id, _)| *id)
                    .collect();
                Ok(json!(ids))
            }
            "create" => {
                let values = args[0].clone();
                let id = state.insert(model, values.clone());
                if model == "product.template" {
                    state.expand_template(id, &values);
                }
                Ok(json!(id))
            }
            "write" => {
                let ids: Vec<i64> = serde_json::from_value(args[0].clone())?;
                let updates = args[1].as_object().cloned().unwrap_or_default();
                for (id, record) in state.tables.entry(model.to_string()).or_default() {
                    if ids.contains(id) {
                        for (key, value) in &updates {
                            record[key.as_str()] = value.clone();
                        }
                    }
                }
                Ok(json!(true))
            }
            other => Err(SyncError::RpcError {
                model: model.to_string(),
                method: other.to_string(),
                message: "unsupported by fake".to_string(),
            }),
        }
    }
}

/// Serves pages from a fixed product list, like a paginated API would.
pub struct FakeCatalog {
    products: Vec<Product>,
    endless: bool,
    requests: Mutex<Vec<(u64, u32)>>,
}

impl FakeCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            endless: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every offset with the same single product.
    pub fn endless(product: Product) -> Self {
        Self {
            products: vec![product],
            endless: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(u64, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_page(&self, offset: u64, limit: u32) -> Result<ProductPage> {
        self.requests.lock().unwrap().push((offset, limit));
        if self.endless {
            return Ok(ProductPage {
                results: self.products.clone(),
            });
        }
        let results = self
            .products
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(ProductPage { results })
    }
}

/// Returns a fixed payload for every URL except the ones marked broken.
#[derive(Default)]
pub struct FakeImages {
    broken: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn with_broken(urls: &[&str]) -> Self {
        Self {
            broken: urls.iter().map(|u| u.to_string()).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for FakeImages {
    async fn fetch_base64(&self, url: &str) -> Option<String> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.broken.contains(url) {
            None
        } else {
            Some(format!("b64:{}", url))
        }
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<u64>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<u64> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl OffsetPublisher for RecordingPublisher {
    async fn publish(&self, offset: u64) -> Result<()> {
        self.published.lock().unwrap().push(offset);
        Ok(())
    }
}

pub struct FakeConfig {
    pub page_limit: u32,
}

impl ConfigProvider for FakeConfig {
    fn page_limit(&self) -> u32 {
        self.page_limit
    }

    fn image_size(&self) -> &str {
        "800x800"
    }

    fn default_category_id(&self) -> i64 {
        1
    }
}
