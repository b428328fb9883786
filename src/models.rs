use serde::{Deserialize, Serialize};

use crate::price::Price;

/// A seller offering a part.
/// A vendor that is not in stock carries a zero `price` and may have no `url` or `image`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    /// Full URL of the vendor's logo.
    pub image: String,
    pub in_stock: bool,
    pub price: Price,
    /// Full affiliate URL to buy the part from.
    pub url: String,
}

/// A named specification with its values in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Number of star icons shown, out of 5.
    pub stars: u32,
    pub count: u32,
    pub average: f64,
}

/// A part with every listed vendor, its specs and rating, built from its product page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Part category, e.g. CPU or Motherboard.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
    pub images: Vec<String>,
    pub vendors: Vec<Vendor>,
    pub specs: Vec<Spec>,
    pub rating: Rating,
}

/// A part as shown in a part list, with only the vendor chosen for the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartListPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub image: String,
    pub url: String,
    pub vendor: Vendor,
}

/// A search result, with the cheapest vendor when one has a price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPart {
    pub name: String,
    pub image: String,
    pub url: String,
    pub vendor: Vendor,
}

/// A compatibility note of a part list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompNote {
    pub message: String,
    /// Severity, e.g. `Warning` or `Note`.
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartList {
    pub url: String,
    pub parts: Vec<PartListPart>,
    /// Price of all parts combined.
    pub price: Price,
    /// Estimated wattage as displayed, e.g. `450W`.
    pub wattage: String,
    pub compatibility: Vec<CompNote>,
}
