use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[type='application/ld+json']").expect("Invalid JSON-LD selector")
});

/// A parsed HTML page.
///
/// Selector reads take CSS selector strings; a selector that does not parse
/// behaves like one that matches nothing.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Raw text of every `application/ld+json` script, in document order.
    pub fn structured_data_payloads(&self) -> Vec<String> {
        self.html
            .select(&JSON_LD_SELECTOR)
            .map(|script| script.text().collect::<String>())
            .collect()
    }

    /// Text of the first element matching `selector`.
    pub fn select_text(&self, selector: &str) -> Option<String> {
        self.first(selector).map(element_text)
    }

    /// Attribute `name` of the first element matching `selector`.
    pub fn select_attr(&self, selector: &str, name: &str) -> Option<String> {
        self.first(selector)
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    }

    /// Text of every element matching `selector`.
    pub fn select_all_text(&self, selector: &str) -> Vec<String> {
        match Selector::parse(selector) {
            Ok(sel) => self.html.select(&sel).map(element_text).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let sel = Selector::parse(selector).ok()?;
        self.html.select(&sel).next()
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}
