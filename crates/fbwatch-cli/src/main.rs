mod track;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Track stale negative feedback for a single Wildberries product.
#[derive(Debug, Parser)]
#[command(name = "fbwatch")]
#[command(about = "Wildberries negative-feedback tracker")]
struct Cli {
    /// Article number (nm id) of the product to track
    #[arg(long)]
    product: i64,

    /// Keep feedbacks rated at or below this value
    #[arg(long, default_value_t = 3)]
    max_rating: i32,

    /// Keep feedbacks at least this many days old
    #[arg(long, default_value_t = 3)]
    min_age_days: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = fbwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = fbwatch_db::PoolConfig::from_app_config(&config);
    let pool = fbwatch_db::connect_pool(&config.database_url, pool_config).await?;
    fbwatch_db::ensure_schema(&pool).await?;

    let mirrors: Vec<&str> = config
        .wb_feedback_mirrors
        .iter()
        .map(String::as_str)
        .collect();
    let client = fbwatch_wb::WbClient::with_endpoints(
        &config.wb_card_base_url,
        &mirrors,
        config.wb_dest_region,
        config.request_timeout_secs,
    )?;

    let summary =
        track::run_tracking(&pool, &client, cli.product, cli.max_rating, cli.min_age_days).await?;

    println!(
        "stored {} of {} fetched feedbacks for product {} ({} retained, {} duplicates, {} failed)",
        summary.stored,
        summary.fetched,
        cli.product,
        summary.retained,
        summary.duplicates,
        summary.failed
    );
    Ok(())
}
