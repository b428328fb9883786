//! Classification and rewriting of PCPartPicker URLs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme, optional two letter regional subdomain and both historical domains.
const HOST: &str = r"https?://(?:[a-z]{2}\.)?(?:pcpartpicker|partpicker)\.com";
const ID: &str = r"[a-zA-Z0-9]{4,8}\b";

static MARKETPLACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{HOST}(?:[/?#]|$)")).expect("marketplace regex"));

static PRODUCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{HOST}/product/{ID}/\S*")).expect("product regex"));

static LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{HOST}/(?:list/{ID}|user/[^/\s]+/saved/(?:#view=)?{ID})"
    ))
    .expect("part list regex")
});

static SAVED_VIEW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{HOST}/user/[^/\s]+/saved/#view={ID}")).expect("saved view regex")
});

/// Returns `true` for any page on the marketplace, regional subdomains included.
pub fn is_marketplace_url(url: &str) -> bool {
    MARKETPLACE_RE.is_match(url)
}

/// Returns `true` for product pages, e.g. `https://pcpartpicker.com/product/abcd1234/name`.
pub fn is_product_url(url: &str) -> bool {
    PRODUCT_RE.is_match(url)
}

/// Returns `true` for `/list/<id>` and `/user/<name>/saved/[#view=]<id>` pages.
pub fn is_part_list_url(url: &str) -> bool {
    LIST_RE.find(url).map_or(false, |m| m.start() == 0)
}

/// Saved lists addressed through the `#view=` fragment are rendered client side.
pub fn needs_list_conversion(url: &str) -> bool {
    SAVED_VIEW_RE.is_match(url)
}

/// Rewrite a saved list URL so the server renders it without scripts.
/// Any other URL is returned unchanged.
pub fn normalize_list_url(url: &str) -> String {
    if needs_list_conversion(url) {
        url.replacen("#view=", "", 1)
    } else {
        url.to_string()
    }
}

/// Vendor slug of an affiliate redirect link (`.../mr/<vendor>/...`).
/// Returns an empty string when the link has no vendor segment.
pub fn extract_vendor_name(url: &str) -> String {
    url.split('/')
        .skip_while(|segment| *segment != "mr")
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

/// Every part list URL in `text`, left to right.
pub fn extract_part_list_urls(text: &str) -> impl Iterator<Item = &str> + '_ {
    LIST_RE.find_iter(text).map(|m| m.as_str())
}
