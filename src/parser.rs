use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// A node of a parsed page that can be queried with CSS selectors.
///
/// The record mapper only talks to pages through this trait, so it does not
/// depend on a particular HTML library.
pub trait Node: Sized {
    /// All descendant text, concatenated.
    fn text_content(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Descendants matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<Self>;

    /// Trimmed text of the first descendant matching `selector`, or an empty string.
    fn child_text(&self, selector: &str) -> String {
        self.select_all(selector)
            .first()
            .map(|node| node.text_content().trim().to_string())
            .unwrap_or_default()
    }

    /// Attribute `name` of the first descendant matching `selector`, or an empty string.
    fn child_attribute(&self, selector: &str, name: &str) -> String {
        self.select_all(selector)
            .first()
            .and_then(|node| node.attribute(name))
            .unwrap_or_default()
    }

    fn for_each_child<F>(&self, selector: &str, mut f: F)
    where
        F: FnMut(usize, Self),
    {
        for (i, node) in self.select_all(selector).into_iter().enumerate() {
            f(i, node)
        }
    }
}

impl<'a> Node for ElementRef<'a> {
    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn select_all(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(selector) => self.select(&selector).collect(),
            Err(_) => {
                warn!("Unusable selector: {}", selector);
                Vec::new()
            }
        }
    }
}

/// Parsed HTML document.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse `html` as a full document.
    pub fn new(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The `<html>` element. Selectors run against its descendants.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, Node};

    const HTML: &str = r#"
<html>
    <body>
        <div class="row">
            <span class="name">  Corsair  </span>
            <a href="/mr/corsair/abc"><img src="//cdn.example.com/logo.png" alt="Corsair"></a>
        </div>
        <div class="row">
            <span class="name">Kingston</span>
        </div>
    </body>
</html>
"#;

    #[test]
    fn test_child_queries() {
        let doc = Document::new(HTML);
        let root = doc.root();

        assert_eq!(root.child_text(".row .name"), "Corsair");
        assert_eq!(root.child_attribute(".row a", "href"), "/mr/corsair/abc");
        assert_eq!(root.child_attribute(".row a img", "alt"), "Corsair");
        assert_eq!(root.child_attribute(".row a img", "title"), "");
        assert_eq!(root.child_text(".missing"), "");
    }

    #[test]
    fn test_for_each_child() {
        let doc = Document::new(HTML);
        let mut names = Vec::new();

        doc.root().for_each_child(".row", |i, row| {
            names.push((i, row.child_text(".name")));
        });

        assert_eq!(
            names,
            vec![(0, "Corsair".to_string()), (1, "Kingston".to_string())]
        );
    }

    #[test]
    fn test_bad_selector_matches_nothing() {
        let doc = Document::new(HTML);
        assert!(doc.root().select_all("..[").is_empty());
    }
}
