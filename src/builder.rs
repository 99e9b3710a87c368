use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::config::ScraperConfig;
use crate::document::Document;
use crate::fetchers::{DocumentFetcher, HeadlessFetcher, RequestFetcher};
use crate::sites::{Rendering, SiteRegistry, SiteScraper};
use crate::{Recipe, ScrapeError};

/// Builder for configuring a [`RecipeScraper`]
#[derive(Debug, Default)]
pub struct RecipeScraperBuilder {
    config: Option<ScraperConfig>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    headless_endpoint: Option<String>,
    sites: Vec<SiteScraper>,
}

impl RecipeScraperBuilder {
    /// Start from a loaded configuration
    ///
    /// Values set directly on the builder take precedence over the
    /// configuration.
    ///
    /// # Example
    /// ```no_run
    /// use recipe_scrape::{RecipeScraper, ScraperConfig};
    ///
    /// let config = ScraperConfig::load().unwrap_or_default();
    /// let builder = RecipeScraper::builder().config(config);
    /// ```
    pub fn config(mut self, config: ScraperConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_scrape::RecipeScraper;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeScraper::builder().timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the user agent sent with page requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the base URL of the headless rendering service
    ///
    /// Without it, `PAGE_SCRIBER_URL` is consulted. Sites that need rendering
    /// fall back to a plain fetch when neither is set.
    pub fn headless_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.headless_endpoint = Some(endpoint.into());
        self
    }

    /// Register an additional site, replacing any registration for its domain
    ///
    /// # Example
    /// ```
    /// use recipe_scrape::sites::{FieldOverride, RecipeField, SiteScraper};
    /// use recipe_scrape::RecipeScraper;
    ///
    /// let builder = RecipeScraper::builder().site(
    ///     SiteScraper::new("example.com", "example.com/recipes/")
    ///         .with_override(FieldOverride::text(RecipeField::Servings, ".yield")),
    /// );
    /// ```
    pub fn site(mut self, site: SiteScraper) -> Self {
        self.sites.push(site);
        self
    }

    /// Build the scraper
    ///
    /// # Errors
    /// Returns `ScrapeError` if:
    /// - a configured site registration is invalid
    /// - an HTTP client cannot be created
    pub fn build(self) -> Result<RecipeScraper, ScrapeError> {
        let config = self.config.unwrap_or_default();

        let timeout = self
            .timeout
            .unwrap_or_else(|| Duration::from_secs(config.timeout));
        let user_agent = self.user_agent.unwrap_or_else(|| config.user_agent.clone());

        let registry = if config.sites.is_empty() && self.sites.is_empty() {
            SiteRegistry::global()
        } else {
            let mut registry = SiteRegistry::from_config(&config)?;
            for site in self.sites {
                registry.register(site);
            }
            Arc::new(registry)
        };

        let fetcher = RequestFetcher::new(timeout, &user_agent)?;
        let headless = match self.headless_endpoint.or(config.headless_endpoint) {
            Some(endpoint) => Some(HeadlessFetcher::new(&endpoint, timeout)?),
            None => HeadlessFetcher::from_env(timeout).transpose()?,
        };

        Ok(RecipeScraper {
            fetcher,
            headless,
            registry,
        })
    }
}

/// Fetches pages and extracts validated recipes from them.
///
/// Holds no per-request state; one instance can serve concurrent calls.
pub struct RecipeScraper {
    fetcher: RequestFetcher,
    headless: Option<HeadlessFetcher>,
    registry: Arc<SiteRegistry>,
}

impl RecipeScraper {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use recipe_scrape::RecipeScraper;
    ///
    /// let builder = RecipeScraper::builder();
    /// ```
    pub fn builder() -> RecipeScraperBuilder {
        RecipeScraperBuilder::default()
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    /// Extracts the recipe at `url`
    ///
    /// The URL is checked against its site registration before anything is
    /// fetched. The page is retrieved once; nothing is retried.
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_scrape::RecipeScraper;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let scraper = RecipeScraper::builder().build()?;
    /// let recipe = scraper
    ///     .fetch_recipe("https://www.simplyrecipes.com/recipes/panzanella_bread_salad/")
    ///     .await?;
    /// println!("{}", recipe.name);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_recipe(&self, url: &str) -> Result<Recipe, ScrapeError> {
        let site = self.registry.resolve(url)?;
        let markup = self.fetch_markup(site, url).await?;

        let document = Document::parse(&markup);
        site.scrape(&document)
    }

    /// Whether `url` answers with a success status. Never fails.
    pub async fn probe_reachable(&self, url: &str) -> bool {
        self.fetcher.probe_reachable(url).await
    }

    async fn fetch_markup(&self, site: &SiteScraper, url: &str) -> Result<String, ScrapeError> {
        let markup = match (site.rendering, &self.headless) {
            (Rendering::Headless, Some(headless)) => headless.fetch(url).await?,
            (Rendering::Headless, None) => {
                warn!(
                    "{} needs a rendered page but no headless endpoint is configured; fetching directly",
                    site.domain
                );
                self.fetcher.fetch(url).await?
            }
            (Rendering::Static, _) => self.fetcher.fetch(url).await?,
        };
        Ok(markup)
    }
}
