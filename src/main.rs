use log::{debug, error};
use recipe_scrape::{RecipeScraper, ScraperConfig};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: recipe-scrape <url> [--probe]";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let probe = args.iter().any(|arg| arg == "--probe");
    let Some(url) = args.iter().find(|arg| !arg.starts_with("--")) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let config = match ScraperConfig::load() {
        Ok(config) => config,
        Err(e) => {
            debug!("Using default configuration: {}", e);
            ScraperConfig::default()
        }
    };

    let scraper = match RecipeScraper::builder().config(config).build() {
        Ok(scraper) => scraper,
        Err(e) => {
            error!("Failed to set up scraper: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if probe {
        let reachable = scraper.probe_reachable(url).await;
        println!("{}", if reachable { "reachable" } else { "unreachable" });
        return if reachable {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match scraper.fetch_recipe(url).await {
        Ok(recipe) => match serde_json::to_string_pretty(&recipe) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to serialize recipe: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error ({:?}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
