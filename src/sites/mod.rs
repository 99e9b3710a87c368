//! Per-site scraping strategies.
//!
//! Every URL resolves to a [`SiteScraper`]: either a registered site, or the
//! default JSON-LD pipeline for hosts nobody registered.

mod overrides;
mod registry;

pub use overrides::{FieldOverride, FieldSource, RecipeField, TimeField};
pub use registry::SiteRegistry;

use crate::config::SiteConfig;
use crate::document::Document;
use crate::error::{ScrapeError, ValidationError};
use crate::extract::{find_recipe_candidates, normalize, validate};
use crate::model::Recipe;
use config::ConfigError;
use log::{debug, warn};

/// How a site's markup has to be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rendering {
    #[default]
    Static,
    /// Markup is only complete after the page's scripts ran
    Headless,
}

/// Scraping strategy for one site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteScraper {
    /// Host this strategy is registered for; empty for the default pipeline
    pub domain: String,
    /// Every URL handled by this strategy must contain this
    pub required_substring: String,
    pub rendering: Rendering,
    /// Applied in order after normalization, before validation
    pub overrides: Vec<FieldOverride>,
}

impl SiteScraper {
    /// Plain JSON-LD extraction without URL restrictions.
    pub fn default_pipeline() -> Self {
        Self::default()
    }

    pub fn new(domain: &str, required_substring: &str) -> Self {
        Self {
            domain: domain.to_string(),
            required_substring: required_substring.to_string(),
            ..Default::default()
        }
    }

    pub fn headless(mut self) -> Self {
        self.rendering = Rendering::Headless;
        self
    }

    pub fn with_override(mut self, field_override: FieldOverride) -> Self {
        self.overrides.push(field_override);
        self
    }

    pub fn is_default_pipeline(&self) -> bool {
        self.domain.is_empty()
    }

    /// Fails when `url` lacks the required substring.
    pub fn check_url(&self, url: &str) -> Result<(), ScrapeError> {
        if url.contains(&self.required_substring) {
            Ok(())
        } else {
            Err(ScrapeError::UrlMismatch {
                url: url.to_string(),
                expected: self.required_substring.clone(),
            })
        }
    }

    /// Runs the strategy against an already retrieved page.
    ///
    /// Candidates are tried in document order and the first one that both
    /// normalizes and validates wins. Candidates that fail to normalize are
    /// skipped. If candidates normalized but none validated, the first
    /// validation failure is returned.
    pub fn scrape(&self, document: &Document) -> Result<Recipe, ScrapeError> {
        let candidates = find_recipe_candidates(document);
        debug!("Found {} recipe candidate(s)", candidates.len());

        let mut first_failure: Option<ValidationError> = None;

        for (index, candidate) in candidates.iter().enumerate() {
            let mut recipe = match normalize(candidate, document) {
                Ok(recipe) => recipe,
                Err(e) => {
                    warn!("Skipping recipe candidate {}: {}", index, e);
                    continue;
                }
            };

            self.apply_overrides(&mut recipe, document);

            match validate(recipe) {
                Ok(recipe) => return Ok(recipe),
                Err(e) => {
                    debug!("Recipe candidate {} failed validation: {}", index, e);
                    first_failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_failure {
            return Err(ScrapeError::Validation(e));
        }

        // Without structured data a site's own selectors may still be enough
        if !self.overrides.is_empty() {
            let mut recipe = Recipe::default();
            self.apply_overrides(&mut recipe, document);
            if let Ok(recipe) = validate(recipe) {
                return Ok(recipe);
            }
        }

        Err(ScrapeError::NoStructuredDataFound)
    }

    fn apply_overrides(&self, recipe: &mut Recipe, document: &Document) {
        for field_override in &self.overrides {
            field_override.apply(recipe, document);
        }
    }
}

impl TryFrom<&SiteConfig> for SiteScraper {
    type Error = ConfigError;

    fn try_from(config: &SiteConfig) -> Result<Self, Self::Error> {
        let domain = config.domain.trim().trim_start_matches("www.").to_lowercase();
        if domain.is_empty() {
            return Err(ConfigError::Message(
                "site registration needs a domain".to_string(),
            ));
        }

        let overrides = config
            .overrides
            .iter()
            .map(FieldOverride::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            domain,
            required_substring: config.required_substring.clone(),
            rendering: if config.headless {
                Rendering::Headless
            } else {
                Rendering::Static
            },
            overrides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn page(json_ld: &[&str], body: &str) -> Document {
        let scripts: String = json_ld
            .iter()
            .map(|json| format!(r#"<script type="application/ld+json">{json}</script>"#))
            .collect();
        Document::parse(&format!(
            "<html><head>{scripts}</head><body>{body}</body></html>"
        ))
    }

    #[test]
    fn test_check_url() {
        let site = SiteScraper::new("example.com", "example.com/recipes/");
        assert!(site.check_url("https://www.example.com/recipes/pie").is_ok());

        let err = site.check_url("https://www.example.com/blog/pie").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UrlMismatch);

        assert!(SiteScraper::default_pipeline()
            .check_url("anything at all")
            .is_ok());
    }

    #[test]
    fn test_first_valid_candidate_wins() {
        let doc = page(
            &[
                r#"{"@type": "Recipe", "name": "Broken", "recipeInstructions": {"@type": "ItemList", "itemListElement": ["oops"]}}"#,
                r#"{"@type": "Recipe", "name": "Good"}"#,
                r#"{"@type": "Recipe", "name": "Later"}"#,
            ],
            "",
        );
        let recipe = SiteScraper::default_pipeline().scrape(&doc).unwrap();
        assert_eq!(recipe.name, "Good");
    }

    #[test]
    fn test_invalid_candidate_skipped_for_valid_one() {
        let doc = page(
            &[
                r#"{"@type": "Recipe", "description": "no name"}"#,
                r#"{"@type": "Recipe", "name": "Named"}"#,
            ],
            "",
        );
        let recipe = SiteScraper::default_pipeline().scrape(&doc).unwrap();
        assert_eq!(recipe.name, "Named");
    }

    #[test]
    fn test_missing_name_is_validation_failure() {
        let doc = page(&[r#"{"@type": "Recipe", "recipeIngredient": ["egg"]}"#], "");
        let err = SiteScraper::default_pipeline().scrape(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_no_candidates() {
        let doc = page(&[r#"{"@type": "WebSite", "name": "Blog"}"#], "");
        let err = SiteScraper::default_pipeline().scrape(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoStructuredDataFound);
    }

    #[test]
    fn test_overrides_run_after_normalization() {
        let doc = page(
            &[r#"{"@type": "Recipe", "name": "Soup", "prepTime": "PT5M", "recipeYield": "2"}"#],
            r#"<span class="prep">5 mins prep</span>"#,
        );
        let site = SiteScraper::new("example.com", "")
            .with_override(FieldOverride::text(RecipeField::Time(TimeField::Prep), ".prep"))
            .with_override(FieldOverride::text(RecipeField::Servings, ".yield"));

        let recipe = site.scrape(&doc).unwrap();
        assert_eq!(recipe.time.prep, "5 mins prep");
        assert_eq!(recipe.servings, "2");
    }

    #[test]
    fn test_overrides_alone_can_supply_a_recipe() {
        let doc = page(&[], r#"<h1 class="title">Flatbread</h1>"#);
        let site = SiteScraper::new("example.com", "")
            .with_override(FieldOverride::text(RecipeField::Name, "h1.title"));
        assert_eq!(site.scrape(&doc).unwrap().name, "Flatbread");

        let empty = page(&[], "");
        let err = site.scrape(&empty).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoStructuredDataFound);
    }

    #[test]
    fn test_site_from_config() {
        let config = SiteConfig {
            domain: "www.Example.com".to_string(),
            required_substring: "example.com/r/".to_string(),
            headless: true,
            overrides: Vec::new(),
        };
        let site = SiteScraper::try_from(&config).unwrap();
        assert_eq!(site.domain, "example.com");
        assert_eq!(site.rendering, Rendering::Headless);
    }
}
