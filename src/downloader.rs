use std::future::Future;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::HeaderConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid header {0:?}")]
    InvalidHeader(String),
}

/// A downloaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Where the request ended up after following redirects.
    pub url: Url,
    pub body: String,
}

/// Something that can download pages.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Page, FetchError>> + Send;
}

/// The internal HTTP client is already wrapped in `Arc`, so the downloader is
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    headers: HeaderConfig,
}

impl Downloader {
    pub fn new(headers: HeaderConfig) -> Result<Self, FetchError> {
        let client = reqwest::ClientBuilder::new().build()?;
        Ok(Self { client, headers })
    }

    fn headers_for(&self, url: &Url) -> Result<HeaderMap, FetchError> {
        let host = url.host_str().unwrap_or_default();
        let mut map = HeaderMap::new();

        for (name, value) in self.headers.merged_for(host) {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| FetchError::InvalidHeader(name.clone()))?;
            let value =
                HeaderValue::from_str(&value).map_err(|_| FetchError::InvalidHeader(name))?;
            map.insert(header, value);
        }

        Ok(map)
    }
}

impl Fetch for Downloader {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let headers = self.headers_for(url)?;
        debug!("GET {} ({} headers)", url, headers.len());

        let response = self
            .client
            .get(url.as_str())
            .headers(headers)
            .send()
            .await?
            .error_for_status()?;

        let url = response.url().clone();
        let body = response.text().await?;

        Ok(Page { url, body })
    }
}

#[cfg(test)]
mod tests {
    use mockito::{mock, Matcher};
    use url::Url;

    use super::{Downloader, Fetch, FetchError};
    use crate::config::HeaderConfig;

    fn server_host() -> String {
        let url = Url::parse(&mockito::server_url()).unwrap();
        url.host_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_fetch_sends_merged_headers() -> anyhow::Result<()> {
        let _m = mock("GET", "/list/Ab12Cd")
            .match_header("user-agent", "host-agent")
            .match_header("accept-language", "en-US")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>list</html>")
            .create();

        let mut headers = HeaderConfig::default();
        headers.set_headers("global", [("user-agent", "global-agent"), ("accept-language", "en-US")]);
        headers.set_headers(&server_host(), [("user-agent", "host-agent")]);

        let url = Url::parse(&mockito::server_url())?.join("/list/Ab12Cd")?;
        let page = Downloader::new(headers)?.fetch(&url).await?;

        assert_eq!(page.url, url);
        assert_eq!(page.body, "<html>list</html>");

        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_reports_redirect_target() -> anyhow::Result<()> {
        let _m = mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(302)
            .with_header("location", "/product/Xy12Ab/ram")
            .create();
        let _p = mock("GET", "/product/Xy12Ab/ram")
            .with_status(200)
            .with_body("<html>product</html>")
            .create();

        let base = Url::parse(&mockito::server_url())?;
        let page = Downloader::new(HeaderConfig::default())?
            .fetch(&base.join("/search?q=ram")?)
            .await?;

        assert_eq!(page.url, base.join("/product/Xy12Ab/ram")?);
        assert_eq!(page.body, "<html>product</html>");

        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() -> anyhow::Result<()> {
        let _m = mock("GET", "/gone").with_status(404).create();

        let url = Url::parse(&mockito::server_url())?.join("/gone")?;
        let result = Downloader::new(HeaderConfig::default())?.fetch(&url).await;

        assert!(matches!(result, Err(FetchError::Request(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_header_name() -> anyhow::Result<()> {
        let mut headers = HeaderConfig::default();
        headers.set_headers("global", [("bad header", "x")]);

        let url = Url::parse(&mockito::server_url())?;
        let result = Downloader::new(headers)?.fetch(&url).await;

        assert!(matches!(result, Err(FetchError::InvalidHeader(name)) if name == "bad header"));

        Ok(())
    }
}
