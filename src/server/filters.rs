use std::{convert::Infallible, sync::Arc};

use warp::Filter;

use super::{handlers, SearchOptions, UrlOptions};
use crate::{downloader::Fetch, scraper::Scraper};

fn with_scraper<F>(
    scraper: Arc<Scraper<F>>,
) -> impl Filter<Extract = (Arc<Scraper<F>>,), Error = Infallible> + Clone
where
    F: Send + Sync,
{
    warp::any().map(move || Arc::clone(&scraper))
}

/// GET /parts?url=<product url>
pub(super) fn part<F>(
    scraper: Arc<Scraper<F>>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
where
    F: Fetch + Send + Sync + 'static,
{
    warp::path!("parts")
        .and(warp::get())
        .and(warp::query::<UrlOptions>())
        .and(with_scraper(scraper))
        .and_then(handlers::part::<F>)
}

/// GET /lists?url=<part list url>
pub(super) fn part_list<F>(
    scraper: Arc<Scraper<F>>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
where
    F: Fetch + Send + Sync + 'static,
{
    warp::path!("lists")
        .and(warp::get())
        .and(warp::query::<UrlOptions>())
        .and(with_scraper(scraper))
        .and_then(handlers::part_list::<F>)
}

/// GET /search?q=<term>&region=<region>
pub(super) fn search<F>(
    scraper: Arc<Scraper<F>>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
where
    F: Fetch + Send + Sync + 'static,
{
    warp::path!("search")
        .and(warp::get())
        .and(warp::query::<SearchOptions>())
        .and(with_scraper(scraper))
        .and_then(handlers::search::<F>)
}
