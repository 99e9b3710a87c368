use crate::document::Document;

/// Page-level values consulted when the structured data leaves a gap.
pub trait FallbackSource {
    /// First non-empty of `meta[name=description]`, `og:description`,
    /// `twitter:description`, with newlines turned into spaces and trimmed.
    /// Empty when none is present.
    fn meta_description(&self) -> String;

    /// First non-empty of `og:image` (by property, then by name) and
    /// `meta[itemprop=image]`.
    fn meta_image(&self) -> Option<String>;
}

const DESCRIPTION_SELECTORS: [&str; 3] = [
    "meta[name='description']",
    "meta[property='og:description']",
    "meta[name='twitter:description']",
];

const IMAGE_SELECTORS: [&str; 3] = [
    "meta[property='og:image']",
    "meta[name='og:image']",
    "meta[itemprop='image']",
];

impl Document {
    fn first_meta_content(&self, selectors: &[&str]) -> Option<String> {
        selectors
            .iter()
            .filter_map(|selector| self.select_attr(selector, "content"))
            .find(|content| !content.is_empty())
    }
}

impl FallbackSource for Document {
    fn meta_description(&self) -> String {
        self.first_meta_content(&DESCRIPTION_SELECTORS)
            .map(|content| content.replace('\n', " ").trim().to_string())
            .unwrap_or_default()
    }

    fn meta_image(&self) -> Option<String> {
        self.first_meta_content(&IMAGE_SELECTORS)
    }
}

/// A fallback source with nothing in it.
pub struct NoFallback;

impl FallbackSource for NoFallback {
    fn meta_description(&self) -> String {
        String::new()
    }

    fn meta_image(&self) -> Option<String> {
        None
    }
}
