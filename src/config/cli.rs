use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "catalog-sync")]
#[command(about = "Copy CatalogIQ products into Odoo, one page per offset")]
pub struct CliArgs {
    #[arg(long, default_value_t = 0, help = "Source catalog offset to start from")]
    pub offset: u64,

    #[arg(
        long,
        help = "TOML config file; environment variables are used when omitted"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Keep syncing following offsets until an empty page")]
    pub follow: bool,

    #[arg(long, requires = "follow", help = "Stop following after this many pages")]
    pub max_pages: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,
}
