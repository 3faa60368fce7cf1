// Adapters layer: concrete implementations of the domain ports for the
// external systems a sync run talks to.

pub mod catalogiq;
pub mod images;
pub mod odoo;
pub mod queue;

pub use catalogiq::CatalogIqClient;
pub use images::HttpImageFetcher;
pub use odoo::OdooClient;
pub use queue::NoopPublisher;

#[cfg(feature = "lambda")]
pub use queue::{QueuePublisher, SqsPublisher};
