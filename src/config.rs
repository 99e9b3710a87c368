use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Scraper configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with page requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Base URL of the headless rendering service
    #[serde(default)]
    pub headless_endpoint: Option<String>,
    /// Site registrations added on top of the built-in ones
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            headless_endpoint: None,
            sites: Vec::new(),
        }
    }
}

/// A site registration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Host the registration applies to (e.g. "example.com")
    pub domain: String,
    /// Substring every URL for this site must contain
    #[serde(default)]
    pub required_substring: String,
    /// Whether pages must be rendered by the headless service
    #[serde(default)]
    pub headless: bool,
    /// Field overrides applied after JSON-LD normalization, in order
    #[serde(default)]
    pub overrides: Vec<OverrideConfig>,
}

/// A single field override
#[derive(Debug, Deserialize, Clone)]
pub struct OverrideConfig {
    /// Recipe field to overwrite (e.g. "name", "time.prep", "ingredients")
    pub field: String,
    /// Where the value comes from
    pub source: OverrideSourceConfig,
    /// CSS selector for the selector-based sources
    #[serde(default)]
    pub selector: Option<String>,
    /// Attribute name for the `attribute` source
    #[serde(default)]
    pub attribute: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverrideSourceConfig {
    Text,
    Attribute,
    AllText,
    MetaDescription,
    MetaImage,
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SCRAPE__ prefix
    /// 2. recipe-scrape.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SCRAPE__HEADLESS_ENDPOINT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`ScraperConfig::load`].
pub fn load_config() -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-scrape").required(false))
        // Use double underscore for nested: RECIPE_SCRAPE__USER_AGENT
        .add_source(
            Environment::with_prefix("RECIPE_SCRAPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
