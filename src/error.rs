use thiserror::Error;

use crate::{downloader::FetchError, price::PriceError};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid PCPartPicker URL: {0}")]
    InvalidUrl(String),
    #[error("invalid region: {0:?}")]
    InvalidRegion(String),
    /// The search resolved straight to a single product page.
    #[error("search redirected to product page {url}")]
    Redirect { url: String },
    #[error(transparent)]
    Parse(#[from] PriceError),
    /// The page does not contain the container the record is built from.
    #[error("unrecognized page layout: {0} not found")]
    MissingRecord(&'static str),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
