pub mod attributes;
pub mod engine;
pub mod message;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{BatchOutcome, LoadOutcome, Product, ProductPage, SyncReport};
pub use crate::domain::ports::{
    CatalogSource, ConfigProvider, ImageFetcher, OdooRpc, OffsetPublisher, Pipeline,
};
pub use crate::utils::error::Result;
