use std::{convert::Infallible, sync::Arc};

use serde::Serialize;
use tracing::warn;
use warp::{http::StatusCode, reply::Response, Reply};

use super::{ErrorBody, SearchOptions, UrlOptions};
use crate::{downloader::Fetch, error::ScrapeError, scraper::Scraper};

fn ok_reply<T: Serialize>(record: &T) -> Response {
    warp::reply::with_status(warp::reply::json(record), StatusCode::OK).into_response()
}

/// Map an error to its response. A search that landed on a product page is
/// answered with `303 See Other` pointing at that page.
fn error_reply(e: ScrapeError) -> Response {
    let status = match &e {
        ScrapeError::InvalidUrl(_) | ScrapeError::InvalidRegion(_) => StatusCode::BAD_REQUEST,
        ScrapeError::Redirect { .. } => StatusCode::SEE_OTHER,
        ScrapeError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ScrapeError::MissingRecord(_) | ScrapeError::Fetch(_) => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
        warn!("Request failed: {}", e);
    }

    let body = ErrorBody {
        error: e.to_string(),
        url: None,
    };

    match e {
        ScrapeError::Redirect { url } => {
            let body = ErrorBody {
                url: Some(url.clone()),
                ..body
            };
            let reply = warp::reply::with_status(warp::reply::json(&body), status);
            warp::reply::with_header(reply, "location", url).into_response()
        }
        _ => warp::reply::with_status(warp::reply::json(&body), status).into_response(),
    }
}

/// Fetch the part behind a product URL.
pub(super) async fn part<F>(options: UrlOptions, scraper: Arc<Scraper<F>>) -> Result<Response, Infallible>
where
    F: Fetch + Send + Sync,
{
    Ok(match scraper.fetch_part(&options.url).await {
        Ok(part) => ok_reply(&part),
        Err(e) => error_reply(e),
    })
}

/// Fetch a part list.
pub(super) async fn part_list<F>(
    options: UrlOptions,
    scraper: Arc<Scraper<F>>,
) -> Result<Response, Infallible>
where
    F: Fetch + Send + Sync,
{
    Ok(match scraper.fetch_part_list(&options.url).await {
        Ok(list) => ok_reply(&list),
        Err(e) => error_reply(e),
    })
}

/// Search for parts, optionally on a regional site.
pub(super) async fn search<F>(
    options: SearchOptions,
    scraper: Arc<Scraper<F>>,
) -> Result<Response, Infallible>
where
    F: Fetch + Send + Sync,
{
    Ok(
        match scraper.search_parts(&options.q, options.region.as_deref()).await {
            Ok(results) => ok_reply(&results),
            Err(e) => error_reply(e),
        },
    )
}
