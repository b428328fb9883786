//! Builds records out of PCPartPicker pages.
//!
//! Each builder receives the root of an already fetched page and the URL the
//! page was served from. Fragments that fail to parse fall back to zero values;
//! only a missing top-level container is reported as an error.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};
use url::Url;

use crate::{
    error::ScrapeError,
    models::{CompNote, Part, PartList, PartListPart, Rating, SearchPart, Spec, Vendor},
    parser::Node,
    price::{parse_price, Price, PriceField},
    urls::extract_vendor_name,
};

const NO_PRICES: &str = "No Prices Available";
const FREE: &str = "FREE";

const PART_LIST_ROOT: &str = ".partlist__wrapper";
const PART_ROOT: &str = ".wrapper__pageTitle section.xs-col-11";
const SEARCH_ROOT: &str = ".search-results__pageContent .block";

static SCRIPT_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src:\s"([^"]*)""#).expect("script image regex"));

/// One priced cell of a vendor row: which field it fills, the label printed
/// in front of the amount and where to find it.
#[derive(Debug)]
struct PriceColumn {
    field: PriceField,
    label: &'static str,
    selector: &'static str,
}

const LIST_ROW_COLUMNS: &[PriceColumn] = &[
    PriceColumn { field: PriceField::Base, label: "Base", selector: ".td__base" },
    PriceColumn { field: PriceField::Promo, label: "Promo", selector: ".td__promo" },
    PriceColumn { field: PriceField::Shipping, label: "Shipping", selector: ".td__shipping" },
    PriceColumn { field: PriceField::Tax, label: "Tax", selector: ".td__tax" },
    PriceColumn { field: PriceField::Final, label: "Price", selector: ".td__price" },
];

const PRICE_TABLE_COLUMNS: &[PriceColumn] = &[
    PriceColumn { field: PriceField::Base, label: "Base", selector: ".td__base" },
    PriceColumn { field: PriceField::Promo, label: "Promo", selector: ".td__promo" },
    PriceColumn { field: PriceField::Shipping, label: "Shipping", selector: ".td__shipping" },
    PriceColumn { field: PriceField::Tax, label: "Tax", selector: ".td__tax" },
    PriceColumn { field: PriceField::Final, label: "Total", selector: ".td__finalPrice" },
];

/// Labels of the part list total rows.
const TOTAL_LABELS: &[(&str, PriceField)] = &[
    ("Base Total:", PriceField::Base),
    ("Tax:", PriceField::Tax),
    ("Promo Discounts:", PriceField::Promo),
    ("Shipping:", PriceField::Shipping),
    ("Total:", PriceField::Final),
];

/// The two kinds of vendor rows. They share the priced columns and differ in
/// where the vendor link and logo live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowShape {
    /// A row of a part list.
    PartList,
    /// A row of a product page's price table.
    PriceTable,
}

impl RowShape {
    fn columns(self) -> &'static [PriceColumn] {
        match self {
            RowShape::PartList => LIST_ROW_COLUMNS,
            RowShape::PriceTable => PRICE_TABLE_COLUMNS,
        }
    }

    fn link(self) -> &'static str {
        match self {
            RowShape::PartList => ".td__where a",
            RowShape::PriceTable => ".td__finalPrice a",
        }
    }

    fn logo(self) -> &'static str {
        match self {
            RowShape::PartList => ".td__where a img",
            RowShape::PriceTable => ".td__logo a img",
        }
    }
}

/// Resolve `href` against the page it was found on. Empty or unusable links
/// become an empty string.
fn absolute(page_url: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }

    match page_url.join(href) {
        Ok(url) => url.into(),
        Err(e) => {
            debug!("Unusable link {:?}: {}", href, e);
            String::new()
        }
    }
}

/// Build the vendor offer of a single row.
fn vendor_row<N: Node>(row: &N, shape: RowShape, page_url: &Url) -> Vendor {
    let mut price = Price::default();
    let mut in_stock = false;

    for column in shape.columns() {
        let text = row.child_text(column.selector);

        if text.is_empty() || text.ends_with(NO_PRICES) {
            continue;
        }

        let amount_text = text.replacen(column.label, "", 1);
        let amount_text = amount_text.trim();

        if amount_text == FREE {
            if column.field == PriceField::Final {
                price.set(column.field, 0.0, "", FREE);
                in_stock = true;
            }
            continue;
        }

        match parse_price(amount_text) {
            Ok((amount, currency)) => {
                price.set(column.field, amount, &currency, amount_text);
                if column.field == PriceField::Final {
                    in_stock = true;
                }
            }
            Err(e) => debug!("Ignoring {} column: {}", column.label, e),
        }
    }

    let mut vendor = Vendor::default();

    if shape == RowShape::PriceTable {
        vendor.name = row.child_attribute(shape.logo(), "alt");
    }

    if in_stock {
        vendor.url = absolute(page_url, &row.child_attribute(shape.link(), "href"));
        vendor.image = absolute(page_url, &row.child_attribute(shape.logo(), "src"));
        if shape == RowShape::PartList {
            vendor.name = extract_vendor_name(&vendor.url);
        }
        vendor.in_stock = true;
        vendor.price = price;
    }

    vendor
}

/// Fill the list price from the total rows, keyed by their labels.
fn list_total<N: Node>(root: &N) -> Price {
    let mut price = Price::default();

    root.for_each_child(".tr__total", |_, row| {
        let label = row.child_text(".td__label");
        let Some((_, field)) = TOTAL_LABELS.iter().find(|(l, _)| *l == label) else {
            trace!("Skipping total row {:?}", label);
            return;
        };

        let text = row.child_text(".td__price");
        match parse_price(&text) {
            Ok((amount, currency)) => price.set(*field, amount, &currency, &text),
            Err(e) => debug!("Ignoring total {:?}: {}", label, e),
        }
    });

    price
}

fn compatibility_note<N: Node>(note: &N) -> CompNote {
    let label = note.child_text("span");
    let text = note.text_content();
    let text = text.trim();

    let message = match text.find(&label) {
        Some(start) if !label.is_empty() => text[start + label.len()..].trim(),
        _ => text,
    };

    CompNote {
        message: message.to_string(),
        level: label.trim_end_matches(':').trim().to_string(),
    }
}

/// Build a part list from its page.
pub fn part_list<N: Node>(root: &N, page_url: &Url) -> Result<PartList, ScrapeError> {
    let wrapper = root
        .select_all(PART_LIST_ROOT)
        .into_iter()
        .next()
        .ok_or(ScrapeError::MissingRecord(PART_LIST_ROOT))?;

    let mut parts = Vec::new();
    wrapper.for_each_child(".tr__product", |_, row| {
        parts.push(PartListPart {
            kind: row.child_text(".td__component"),
            name: row.child_text(".td__name"),
            image: absolute(page_url, &row.child_attribute(".td__image img", "src")),
            url: absolute(page_url, &row.child_attribute(".td__name a", "href")),
            vendor: vendor_row(&row, RowShape::PartList, page_url),
        });
    });

    let mut compatibility = Vec::new();
    wrapper.for_each_child("#compatibility_notes .info-message", |_, note| {
        compatibility.push(compatibility_note(&note));
    });

    let wattage = wrapper.child_text(".partlist__keyMetric");
    let wattage = wattage.trim_start_matches("Estimated Wattage:").trim();

    debug!("Part list {}: {} parts", page_url, parts.len());

    Ok(PartList {
        url: page_url.to_string(),
        parts,
        price: list_total(&wrapper),
        wattage: wattage.to_string(),
        compatibility,
    })
}

/// Stars come from the number of rating icons; count and average from the
/// `(N Ratings, X Average)` text beside the title.
fn rating<N: Node>(container: &N, title: &str) -> Rating {
    let mut rating = Rating {
        stars: container.select_all(".product--rating li").len().min(5) as u32,
        ..Rating::default()
    };

    let breadcrumb = container.child_text(".breadcrumb");
    let mut text = container.text_content();
    if !title.is_empty() {
        text = text.replace(title, "");
    }
    if !breadcrumb.is_empty() {
        text = text.replace(&breadcrumb, "");
    }

    let segments: Vec<&str> = text.trim().split(',').collect();
    if segments.len() < 2 {
        return rating;
    }

    let is_noise = |c: char| c == '(' || c == ')' || c.is_whitespace();

    let count = segments[0].replace("Ratings", "");
    rating.count = count.trim_matches(is_noise).parse().unwrap_or_else(|_| {
        debug!("Unreadable rating count {:?}", count);
        0
    });

    let average = segments[1].replace("Average", "");
    rating.average = average.trim_matches(is_noise).parse().unwrap_or_else(|_| {
        debug!("Unreadable rating average {:?}", average);
        0.0
    });

    rating
}

fn images<N: Node>(root: &N, page_url: &Url) -> Vec<String> {
    let mut images: Vec<String> = root
        .select_all(".single_image_gallery_box")
        .iter()
        .map(|gallery| absolute(page_url, &gallery.child_attribute("a img", "src")))
        .filter(|src| !src.is_empty())
        .collect();

    if images.is_empty() {
        root.for_each_child("script", |_, script| {
            let text = script.text_content();
            for capture in SCRIPT_IMAGE_RE.captures_iter(&text) {
                let src = &capture[1];
                if src.starts_with("//") {
                    images.push(format!("https:{}", src));
                } else {
                    images.push(src.to_string());
                }
            }
        });
    }

    images
}

/// Specs of the first `.specs` block that has any groups. Pages repeat the
/// block in hidden markup.
fn specs<N: Node>(root: &N) -> Vec<Spec> {
    let mut specs = Vec::new();

    root.for_each_child(".specs", |_, container| {
        if !specs.is_empty() {
            return;
        }

        container.for_each_child(".group", |_, group| {
            let mut values: Vec<String> = group
                .select_all(".group__content li")
                .iter()
                .map(|li| li.text_content().trim().to_string())
                .collect();

            if values.is_empty() {
                values.push(group.child_text(".group__content"));
            }

            specs.push(Spec {
                name: group.child_text(".group__title"),
                values,
            });
        });
    });

    specs
}

/// Build a part from its product page.
pub fn part<N: Node>(root: &N, page_url: &Url) -> Result<Part, ScrapeError> {
    let title = root
        .select_all(PART_ROOT)
        .into_iter()
        .next()
        .ok_or(ScrapeError::MissingRecord(PART_ROOT))?;

    let name = title.child_text(".pageTitle");
    let kind = title
        .select_all(".breadcrumb a")
        .last()
        .map(|a| a.text_content().trim().to_string())
        .unwrap_or_default();

    let mut vendors = Vec::new();
    root.for_each_child("#prices table tbody tr", |_, row| {
        if row.attribute("class").map_or(false, |class| !class.is_empty()) {
            return;
        }
        vendors.push(vendor_row(&row, RowShape::PriceTable, page_url));
    });

    debug!("Part {:?}: {} vendors", name, vendors.len());

    Ok(Part {
        kind,
        rating: rating(&title, &name),
        name,
        url: page_url.to_string(),
        images: images(root, page_url),
        vendors,
        specs: specs(root),
    })
}

/// Build the results of a search page.
pub fn search_results<N: Node>(root: &N, page_url: &Url) -> Result<Vec<SearchPart>, ScrapeError> {
    let blocks = root.select_all(SEARCH_ROOT);
    if blocks.is_empty() {
        return Err(ScrapeError::MissingRecord(SEARCH_ROOT));
    }

    let mut results = Vec::new();
    for block in &blocks {
        block.for_each_child(".list-unstyled li", |_, row| {
            let price_text = row.child_text(".search_results--price a");

            // Any price text marks the row in stock, even when it does not parse.
            let mut vendor = Vendor::default();
            if !price_text.is_empty() {
                let (total, currency) = parse_price(&price_text).unwrap_or_else(|e| {
                    debug!("Ignoring search price: {}", e);
                    (0.0, String::new())
                });
                vendor.url = absolute(page_url, &row.child_attribute(".search_results--price a", "href"));
                vendor.name = extract_vendor_name(&vendor.url);
                vendor.in_stock = true;
                vendor.price = Price {
                    total,
                    currency,
                    total_string: price_text,
                    ..Price::default()
                };
            }

            results.push(SearchPart {
                name: row.child_text(".search_results--link a"),
                image: absolute(page_url, &row.child_attribute(".search_results--img a img", "src")),
                url: absolute(page_url, &row.child_attribute(".search_results--link a", "href")),
                vendor,
            });
        });
    }

    debug!("Search {}: {} results", page_url, results.len());

    Ok(results)
}
