use anyhow::Context;
use catalog_sync::utils::error::ErrorSeverity;
use catalog_sync::utils::{logger, validation::Validate};
use catalog_sync::{
    CatalogIqClient, CatalogPipeline, CliArgs, HttpImageFetcher, NoopPublisher, OdooClient,
    SyncConfig, SyncEngine, SyncError,
};
use clap::Parser;

async fn sync(args: &CliArgs, config: SyncConfig) -> Result<(), SyncError> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let source = CatalogIqClient::from_config(http.clone(), &config);
    let odoo = OdooClient::from_config(http, &config).await?;
    let images = HttpImageFetcher::new(config.image_timeout)?;

    // The CLI walks the offset chain itself instead of going through a queue.
    let pipeline = CatalogPipeline::new(source, odoo, images, NoopPublisher, config);
    let engine = SyncEngine::new_with_monitoring(pipeline, args.monitor);

    let reports = if args.follow {
        engine.run_chain(args.offset, args.max_pages).await?
    } else {
        vec![engine.run_once(args.offset).await?]
    };

    let created: usize = reports.iter().map(|r| r.template_ids.len()).sum();
    let variants: usize = reports.iter().map(|r| r.variants_updated).sum();
    println!(
        "✅ Synced {} product(s) across {} page(s), {} variant SKU(s) updated",
        created,
        reports.len(),
        variants
    );
    match reports.last().and_then(|r| r.next_offset) {
        Some(next) => println!("➡️  Next offset: {}", next),
        None => println!("🏁 Source catalog exhausted"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logger::init_cli_logger(args.verbose);
    tracing::debug!("CLI args: {:?}", args);

    let config = match &args.config {
        Some(path) => SyncConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SyncConfig::from_env().context("loading config from environment")?,
    };
    config.validate().context("validating configuration")?;

    if let Err(e) = sync(&args, config).await {
        tracing::error!(
            "❌ Sync failed: {} (severity: {:?})",
            e,
            e.severity()
        );
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
