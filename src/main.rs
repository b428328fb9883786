use partpicker::{server, AppConfig, Downloader, Scraper};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    let config = AppConfig::load()?;
    let scraper = Scraper::new(Downloader::new(config.headers)?);

    server::server(scraper, config.bind).await
}
