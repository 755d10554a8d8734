use app_state::load_app_settings;
use clap::Parser;
use color_eyre::Result;
use common_services::database::get_db_pool;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use worker::worker::create_worker;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Drain the queue once and exit instead of polling forever.
    #[clap(long, default_value_t = false, short, action)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_app_settings()?;
    let level = settings.logging.level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    color_eyre::install()?;

    let pool = get_db_pool(&settings).await?;
    create_worker(pool, settings, Args::parse().once).await?;

    Ok(())
}
