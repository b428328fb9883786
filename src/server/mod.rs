mod filters;
mod handlers;

use std::{net::SocketAddr, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::{
    signal::{self, unix::SignalKind},
    sync::broadcast,
};
use tracing::info;
use warp::Filter;

use crate::{downloader::Fetch, scraper::Scraper};

/// GET query options for the part and part list requests.
#[derive(Debug, Deserialize)]
struct UrlOptions {
    url: String,
}

/// GET query options for the search request.
#[derive(Debug, Deserialize)]
struct SearchOptions {
    q: String,
    region: Option<String>,
}

/// Body of every error response. `url` is set when a search redirected to a
/// product page.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Create the webserver and serve the routes until a shutdown signal arrives.
pub async fn server<F>(scraper: Scraper<F>, addr: SocketAddr) -> anyhow::Result<()>
where
    F: Fetch + Send + Sync + 'static,
{
    let scraper = Arc::new(scraper);
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

    let routes = filters::part(Arc::clone(&scraper))
        .or(filters::part_list(Arc::clone(&scraper)))
        .or(filters::search(scraper));

    let mut sigterm = signal::unix::signal(SignalKind::terminate())?;
    let mut sigquit = signal::unix::signal(SignalKind::quit())?;

    tokio::spawn(async move {
        let kill = signal::ctrl_c();

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigquit.recv() => {},
            _ = kill => {},
        }

        info!("Received shutdown signal. Sending shutdown command.");
        let _ = shutdown_tx.send(());
    });

    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, async move {
        shutdown_rx.recv().await.ok();
    })?;

    info!("Listening on {}", addr);
    server.await;

    Ok(())
}
