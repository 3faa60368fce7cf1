pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{CatalogIqClient, HttpImageFetcher, NoopPublisher, OdooClient};
pub use config::SyncConfig;
pub use crate::core::{engine::SyncEngine, sync::CatalogPipeline};
pub use utils::error::{Result, SyncError};
