use crate::core::attributes::AttributeResolver;
use crate::domain::model::{AttributeLine, LoadOutcome, Product};
use crate::domain::ports::{
    CatalogSource, ConfigProvider, ImageFetcher, OdooRpc, OffsetPublisher, Pipeline,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

/// CatalogIQ serves resized renditions under `<image url>/<width>x<height>`.
pub fn sized_image_url(url: &str, size: &str) -> String {
    format!("{}/{}", url.trim_end_matches('/'), size)
}

/// Field mapping from a CatalogIQ product to an Odoo `product.template`.
pub fn template_values(
    product: &Product,
    lines: &[AttributeLine],
    image: Option<String>,
    category_id: i64,
) -> Value {
    let mut values = json!({
        "name": product.name,
        "type": "product",
        "categ_id": category_id,
        "attribute_line_ids": lines.iter().map(AttributeLine::to_command).collect::<Vec<_>>(),
    });

    if let Some(image) = image {
        values["image_1920"] = json!(image);
    }
    if let Some(code) = &product.default_code {
        values["default_code"] = json!(code);
    }
    if let Some(price) = product.price {
        values["list_price"] = json!(price);
    }
    if let Some(description) = &product.description {
        values["description"] = json!(description);
    }
    values
}

/// Copies CatalogIQ products into Odoo: one template per product, its extra
/// images, and SKUs on the variants Odoo generates from the attribute lines.
pub struct CatalogPipeline<S, O, I, P, C>
where
    S: CatalogSource,
    O: OdooRpc,
    I: ImageFetcher,
    P: OffsetPublisher,
    C: ConfigProvider,
{
    source: S,
    odoo: O,
    images: I,
    publisher: P,
    config: C,
}

impl<S, O, I, P, C> CatalogPipeline<S, O, I, P, C>
where
    S: CatalogSource,
    O: OdooRpc,
    I: ImageFetcher,
    P: OffsetPublisher,
    C: ConfigProvider,
{
    pub fn new(source: S, odoo: O, images: I, publisher: P, config: C) -> Self {
        Self {
            source,
            odoo,
            images,
            publisher,
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    #[cfg(test)]
    pub(crate) fn odoo(&self) -> &O {
        &self.odoo
    }

    #[cfg(test)]
    pub(crate) fn publisher(&self) -> &P {
        &self.publisher
    }

    async fn fetch_image(&self, url: Option<&str>) -> Option<String> {
        let url = url?;
        self.images
            .fetch_base64(&sized_image_url(url, self.config.image_size()))
            .await
    }

    async fn create_template(
        &self,
        product: &Product,
        resolver: &mut AttributeResolver<'_, O>,
    ) -> Result<i64> {
        let lines = resolver.build_attribute_lines(product).await?;
        let image = self.fetch_image(product.main_image.as_deref()).await;
        let values = template_values(product, &lines, image, self.config.default_category_id());

        let template_id = self.odoo.create("product.template", values).await?;
        tracing::info!(
            "🆕 Created product template {} for '{}' with {} attribute line(s)",
            template_id,
            product.name,
            lines.len()
        );
        Ok(template_id)
    }

    async fn attach_images(&self, template_id: i64, product: &Product) -> Result<usize> {
        let mut attached = 0;
        for image in &product.images {
            let Some(encoded) = self.fetch_image(Some(&image.url)).await else {
                continue;
            };
            self.odoo
                .create(
                    "product.image",
                    json!({
                        "name": image.name,
                        "image_1920": encoded,
                        "product_tmpl_id": template_id,
                    }),
                )
                .await?;
            attached += 1;
        }
        Ok(attached)
    }

    async fn update_variant_skus(
        &self,
        template_id: i64,
        product: &Product,
        resolver: &mut AttributeResolver<'_, O>,
        updated: &mut usize,
    ) -> Result<()> {
        for variant in &product.variants {
            let mut domain = vec![json!(["product_tmpl_id", "=", template_id])];

            for attribute in &variant.attributes {
                let attribute_id = resolver.resolve_attribute(&attribute.name).await?;
                let value_id = resolver.resolve_value(attribute_id, &attribute.value).await?;
                let ptav_ids = self
                    .odoo
                    .search(
                        "product.template.attribute.value",
                        json!([
                            ["product_attribute_value_id", "=", value_id],
                            ["product_tmpl_id", "=", template_id]
                        ]),
                    )
                    .await?;
                domain.push(json!(["product_template_attribute_value_ids", "in", ptav_ids]));
            }

            let variant_ids = self
                .odoo
                .search("product.product", Value::Array(domain))
                .await?;
            if variant_ids.is_empty() {
                tracing::warn!(
                    "No variant found for {:?} on template {}, skipping remaining variants",
                    variant.attributes,
                    template_id
                );
                return Ok(());
            }

            let mut values = json!({});
            if let Some(code) = &variant.default_code {
                values["default_code"] = json!(code);
            }
            if let Some(image) = self.fetch_image(variant.image.as_deref()).await {
                values["image_1920"] = json!(image);
            }
            if values.as_object().is_some_and(|v| v.is_empty()) {
                continue;
            }

            self.odoo
                .write("product.product", &variant_ids, values)
                .await?;
            tracing::debug!(
                "Updated variant(s) {:?} with SKU {:?}",
                variant_ids,
                variant.default_code
            );
            *updated += variant_ids.len();
        }
        Ok(())
    }
}

#[async_trait]
impl<S, O, I, P, C> Pipeline for CatalogPipeline<S, O, I, P, C>
where
    S: CatalogSource,
    O: OdooRpc,
    I: ImageFetcher,
    P: OffsetPublisher,
    C: ConfigProvider,
{
    async fn extract(&self, offset: u64) -> Result<Vec<Product>> {
        let page = self
            .source
            .fetch_page(offset, self.config.page_limit())
            .await?;
        Ok(page.results)
    }

    async fn load(&self, product: &Product) -> Result<LoadOutcome> {
        let mut resolver = AttributeResolver::new(&self.odoo);

        let template_id = self.create_template(product, &mut resolver).await?;
        let images_attached = self.attach_images(template_id, product).await?;

        let mut variants_updated = 0;
        if let Err(e) = self
            .update_variant_skus(template_id, product, &mut resolver, &mut variants_updated)
            .await
        {
            tracing::error!(
                "Error updating variant SKUs for template {}: {}",
                template_id,
                e
            );
        }

        Ok(LoadOutcome {
            template_id,
            variants_updated,
            images_attached,
        })
    }

    async fn publish_next(&self, offset: u64) -> Result<()> {
        self.publisher.publish(offset).await
    }
}
