//! Extracts a canonical [`Recipe`] from recipe web pages.
//!
//! Pages are located by URL, fetched once, and their `schema.org/Recipe`
//! JSON-LD is normalized into a single fixed shape. Sites with their own
//! quirks are handled by [`sites::SiteScraper`] registrations that layer
//! CSS-selector reads on top of the JSON-LD result.

pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod model;
pub mod sites;

pub use builder::{RecipeScraper, RecipeScraperBuilder};
pub use crate::config::ScraperConfig;
pub use error::{ErrorKind, FetchError, NormalizeError, ScrapeError, ValidationError};
pub use model::{Recipe, RecipeTime, SectionedInstruction};

/// Extracts the recipe at `url` using the default settings and built-in sites.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = recipe_scrape::fetch_recipe("https://example.com/recipes/pie").await?;
/// println!("{}: {} ingredients", recipe.name, recipe.ingredients.len());
/// # Ok(())
/// # }
/// ```
pub async fn fetch_recipe(url: &str) -> Result<Recipe, ScrapeError> {
    RecipeScraper::builder().build()?.fetch_recipe(url).await
}

/// Whether `url` answers with a success status. Transport errors yield `false`.
pub async fn probe_reachable(url: &str) -> bool {
    match RecipeScraper::builder().build() {
        Ok(scraper) => scraper.probe_reachable(url).await,
        Err(_) => false,
    }
}
