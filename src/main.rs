use dotenv::dotenv;
use log::info;

use roulette_bot::commands::start;
use roulette_bot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    info!("starting roulette table, snapshot at {}", config.table_file.display());
    start(config).await
}
