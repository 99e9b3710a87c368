use super::{FieldOverride, FieldSource, RecipeField, SiteScraper, TimeField};
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use config::ConfigError;
use log::info;
use reqwest::Url;
use std::sync::{Arc, LazyLock};

static BUILTIN: LazyLock<Arc<SiteRegistry>> = LazyLock::new(|| Arc::new(SiteRegistry::builtin()));

/// Maps hosts to their scraping strategies. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<SiteScraper>,
    default: SiteScraper,
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SiteRegistry {
    /// A registry that sends every URL through the default pipeline.
    pub fn empty() -> Self {
        Self {
            sites: Vec::new(),
            default: SiteScraper::default_pipeline(),
        }
    }

    /// The sites this crate ships with.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        registry.register(
            SiteScraper::new("therealfooddietitians.com", "therealfooddietitians.com/")
                .headless()
                .with_override(FieldOverride::new(
                    RecipeField::Description,
                    FieldSource::MetaDescription,
                ))
                .with_override(FieldOverride::text(
                    RecipeField::Time(TimeField::Prep),
                    ".tasty-recipes-prep-time",
                ))
                .with_override(FieldOverride::text(
                    RecipeField::Time(TimeField::Cook),
                    ".tasty-recipes-cook-time",
                ))
                .with_override(FieldOverride::text(
                    RecipeField::Time(TimeField::Total),
                    ".tasty-recipes-total-time",
                ))
                .with_override(FieldOverride::text(
                    RecipeField::Servings,
                    ".tasty-recipes-yield > span",
                )),
        );
        registry.register(SiteScraper::new(
            "simplyrecipes.com",
            "simplyrecipes.com/recipes/",
        ));
        registry.register(SiteScraper::new(
            "woolworths.com.au",
            "woolworths.com.au/shop/recipedetail/",
        ));

        registry
    }

    /// The built-in registry, constructed once per process and shared.
    pub fn global() -> Arc<SiteRegistry> {
        Arc::clone(&*BUILTIN)
    }

    /// Built-in sites plus the ones declared in `config`.
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::global().as_ref().clone();
        for site in &config.sites {
            registry.register(SiteScraper::try_from(site)?);
        }
        Ok(registry)
    }

    /// Adds `site`, replacing any registration for the same domain.
    pub fn register(&mut self, site: SiteScraper) {
        self.sites.retain(|existing| existing.domain != site.domain);
        self.sites.push(site);
    }

    pub fn sites(&self) -> &[SiteScraper] {
        &self.sites
    }

    /// Picks the strategy for `url` and checks the URL against it.
    ///
    /// No network access happens here.
    pub fn resolve(&self, url: &str) -> Result<&SiteScraper, ScrapeError> {
        let parsed = Url::parse(url).map_err(|_| ScrapeError::UrlMismatch {
            url: url.to_string(),
            expected: "an absolute http(s) URL".to_string(),
        })?;

        let host = parsed
            .host_str()
            .unwrap_or_default()
            .trim_start_matches("www.")
            .to_lowercase();

        let site = self
            .sites
            .iter()
            .find(|site| host_matches(&host, &site.domain))
            .unwrap_or(&self.default);

        site.check_url(url)?;

        if site.is_default_pipeline() {
            info!("Using default JSON-LD pipeline for {}", url);
        } else {
            info!("Using {} scraper for {}", site.domain, url);
        }
        Ok(site)
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
