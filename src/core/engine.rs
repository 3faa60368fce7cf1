use crate::core::message::{parse_offset_message, QueueMessage};
use crate::domain::model::{BatchOutcome, SyncReport};
use crate::domain::ports::Pipeline;
use crate::utils::error::{Result, SyncError};
use crate::utils::monitor::ResourceMonitor;
use std::time::Instant;

pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    /// Syncs the page at `offset` and, when it held any products, hands the
    /// following offset to the publisher.
    pub async fn run(&self, offset: u64) -> Result<SyncReport> {
        let started = Instant::now();
        tracing::info!("🚀 Starting sync at offset {}", offset);

        let products = self.pipeline.extract(offset).await?;
        self.monitor.log_stats("extract");

        let mut report = SyncReport {
            offset,
            products_fetched: products.len(),
            ..SyncReport::default()
        };

        if products.is_empty() {
            tracing::info!("Source returned no products at offset {}, nothing to do", offset);
            return Ok(report);
        }

        // Checked before anything reaches Odoo.
        let next_offset = offset
            .checked_add(products.len() as u64)
            .ok_or_else(|| SyncError::MessageError {
                message: format!(
                    "offset {} leaves no room for the {} product(s) on its page",
                    offset,
                    products.len()
                ),
            })?;

        for product in &products {
            let outcome = self.pipeline.load(product).await?;
            report.template_ids.push(outcome.template_id);
            report.variants_updated += outcome.variants_updated;
            report.images_attached += outcome.images_attached;
            self.monitor.log_stats("load");
        }

        self.pipeline.publish_next(next_offset).await?;
        report.next_offset = Some(next_offset);

        tracing::info!(
            "✅ Synced {} product(s) from offset {} in {:?}",
            report.template_ids.len(),
            offset,
            started.elapsed()
        );
        Ok(report)
    }

    /// Syncs a single offset and logs the run's final resource usage.
    pub async fn run_once(&self, offset: u64) -> Result<SyncReport> {
        let report = self.run(offset).await;
        self.monitor.log_final_stats();
        report
    }

    /// Syncs every queue message in order. A failing message does not stop
    /// the rest of the batch; its id is reported so only it is redelivered.
    pub async fn run_batch(&self, messages: &[QueueMessage<'_>]) -> BatchOutcome {
        if messages.len() > 1 {
            tracing::warn!(
                "Received {} messages in one batch, each one forks the offset chain",
                messages.len()
            );
        }

        let mut outcome = BatchOutcome::default();
        for message in messages {
            let body = message.body.unwrap_or("{}");
            let result = match parse_offset_message(body.as_bytes()) {
                Ok(offset) => self.run(offset).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(report) => outcome.reports.push(report),
                Err(e) => {
                    tracing::error!(
                        message_id = message.id,
                        severity = ?e.severity(),
                        "❌ Message failed: {}",
                        e
                    );
                    outcome.failed_message_ids.push(message.id.to_string());
                }
            }
        }
        outcome
    }

    /// Keeps syncing successive offsets until the source runs dry or
    /// `max_pages` pages have been processed.
    pub async fn run_chain(&self, start: u64, max_pages: Option<usize>) -> Result<Vec<SyncReport>> {
        let mut reports = Vec::new();
        let mut offset = Some(start);

        while let Some(current) = offset {
            if max_pages.is_some_and(|max| reports.len() >= max) {
                tracing::info!("Reached page limit, next offset would be {}", current);
                break;
            }
            let report = self.run(current).await?;
            offset = report.next_offset;
            reports.push(report);
        }

        self.monitor.log_final_stats();
        Ok(reports)
    }
}
