//! Scraper for PCPartPicker parts, part lists and searches.

pub mod config;
pub mod downloader;
pub mod error;
pub mod mapper;
pub mod models;
pub mod parser;
pub mod price;
pub mod scraper;
pub mod server;
pub mod urls;

pub use crate::{
    config::{AppConfig, HeaderConfig},
    downloader::{Downloader, Fetch, FetchError, Page},
    error::ScrapeError,
    models::{CompNote, Part, PartList, PartListPart, Rating, SearchPart, Spec, Vendor},
    price::{parse_price, Price, PriceError},
    scraper::Scraper,
};
