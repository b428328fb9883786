use tracing::info;
use url::Url;

use crate::{
    downloader::{Downloader, Fetch, Page},
    error::ScrapeError,
    mapper,
    models::{Part, PartList, SearchPart},
    parser::Document,
    urls::{is_marketplace_url, is_product_url, normalize_list_url},
};

/// Entry points for fetching PCPartPicker records.
/// Every call fetches its page once and builds the record from it; nothing is
/// shared between calls besides the fetcher.
#[derive(Debug, Clone)]
pub struct Scraper<F = Downloader> {
    fetcher: F,
}

impl<F: Fetch> Scraper<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    async fn visit(&self, url: &str) -> Result<Page, ScrapeError> {
        let url = Url::parse(url).map_err(|_| ScrapeError::InvalidUrl(url.to_string()))?;
        Ok(self.fetcher.fetch(&url).await?)
    }

    /// Fetch a part list. Saved list URLs are rewritten to their server
    /// rendered form first.
    pub async fn fetch_part_list(&self, url: &str) -> Result<PartList, ScrapeError> {
        if !is_marketplace_url(url) {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }

        let url = normalize_list_url(url);
        info!("Fetching part list {}", url);

        let page = self.visit(&url).await?;
        mapper::part_list(&Document::new(&page.body).root(), &page.url)
    }

    /// Search for parts. `region` is an optional two letter subdomain such as `uk`.
    ///
    /// A search with a single hit is answered with the product page itself, in
    /// which case [`ScrapeError::Redirect`] carries that page's URL.
    pub async fn search_parts(
        &self,
        term: &str,
        region: Option<&str>,
    ) -> Result<Vec<SearchPart>, ScrapeError> {
        let url = search_url(term, region);
        if !is_marketplace_url(&url) {
            return Err(ScrapeError::InvalidRegion(region.unwrap_or_default().to_string()));
        }

        info!("Searching {:?} ({})", term, url);

        let page = self.visit(&url).await?;
        if is_product_url(page.url.as_str()) {
            return Err(ScrapeError::Redirect {
                url: page.url.to_string(),
            });
        }

        mapper::search_results(&Document::new(&page.body).root(), &page.url)
    }

    /// Fetch a part from its product page.
    pub async fn fetch_part(&self, url: &str) -> Result<Part, ScrapeError> {
        if !is_product_url(url) {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }

        info!("Fetching part {}", url);

        let page = self.visit(url).await?;
        mapper::part(&Document::new(&page.body).root(), &page.url)
    }
}

fn search_url(term: &str, region: Option<&str>) -> String {
    let region = match region.map(str::trim) {
        Some(region) if !region.is_empty() => format!("{}.", region.to_lowercase()),
        _ => String::new(),
    };
    let query: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();

    format!("https://{}pcpartpicker.com/search?q={}", region, query)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use url::Url;

    use super::{search_url, Scraper};
    use crate::{
        downloader::{Fetch, FetchError, Page},
        error::ScrapeError,
        tests::{CannedFetcher, PART_HTML, PART_LIST_HTML, SEARCH_HTML},
    };

    /// Records every requested URL and answers with the URL unchanged.
    #[derive(Debug, Default, Clone)]
    struct RecordingFetcher {
        requested: Arc<Mutex<Vec<String>>>,
        body: &'static str,
    }

    impl Fetch for RecordingFetcher {
        async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(Page {
                url: url.clone(),
                body: self.body.to_string(),
            })
        }
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            search_url("ryzen 5600x", None),
            "https://pcpartpicker.com/search?q=ryzen+5600x"
        );
        assert_eq!(
            search_url("a&b", Some("DE")),
            "https://de.pcpartpicker.com/search?q=a%26b"
        );
        assert_eq!(search_url("x", Some("")), "https://pcpartpicker.com/search?q=x");
    }

    #[tokio::test]
    async fn test_part_list_is_normalized_before_fetch() -> anyhow::Result<()> {
        let fetcher = RecordingFetcher {
            body: PART_LIST_HTML,
            ..Default::default()
        };
        let scraper = Scraper::new(fetcher.clone());

        let list = scraper
            .fetch_part_list("https://uk.pcpartpicker.com/user/bob/saved/#view=Ab12Cd")
            .await?;

        assert_eq!(
            *fetcher.requested.lock().unwrap(),
            vec!["https://uk.pcpartpicker.com/user/bob/saved/Ab12Cd".to_string()]
        );
        assert_eq!(list.url, "https://uk.pcpartpicker.com/user/bob/saved/Ab12Cd");
        assert_eq!(list.parts.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_urls_are_rejected_before_fetch() {
        let fetcher = RecordingFetcher::default();
        let scraper = Scraper::new(fetcher.clone());

        let list = scraper.fetch_part_list("https://example.com/list/Ab12Cd").await;
        assert!(matches!(list, Err(ScrapeError::InvalidUrl(_))));

        let part = scraper.fetch_part("https://pcpartpicker.com/list/Ab12Cd").await;
        assert!(matches!(part, Err(ScrapeError::InvalidUrl(_))));

        let search = scraper.search_parts("ram", Some("usa")).await;
        assert!(matches!(search, Err(ScrapeError::InvalidRegion(region)) if region == "usa"));

        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_redirected_to_product() -> anyhow::Result<()> {
        let product = "https://pcpartpicker.com/product/Xy12Ab/corsair-vengeance";
        let scraper = Scraper::new(CannedFetcher::new(product, PART_HTML));

        match scraper.search_parts("corsair vengeance", None).await {
            Err(ScrapeError::Redirect { url }) => assert_eq!(url, product),
            other => panic!("expected a redirect, got {:?}", other),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_search_parts() -> anyhow::Result<()> {
        let scraper = Scraper::new(CannedFetcher::new(
            "https://de.pcpartpicker.com/search?q=ryzen",
            SEARCH_HTML,
        ));

        let results = scraper.search_parts("ryzen", Some("de")).await?;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].vendor.name, "mindfactory");

        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_part() -> anyhow::Result<()> {
        let url = "https://pcpartpicker.com/product/g94BD3/amd-ryzen-5-5600x";
        let scraper = Scraper::new(CannedFetcher::new(url, PART_HTML));

        let part = scraper.fetch_part(url).await?;
        assert_eq!(part.url, Url::parse(url)?.to_string());
        assert_eq!(part.vendors.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_unrecognized_page_is_reported() {
        let url = "https://pcpartpicker.com/product/g94BD3/amd-ryzen-5-5600x";
        let scraper = Scraper::new(CannedFetcher::new(url, "<html><body>maintenance</body></html>"));

        let part = scraper.fetch_part(url).await;
        assert!(matches!(part, Err(ScrapeError::MissingRecord(_))));
    }
}
