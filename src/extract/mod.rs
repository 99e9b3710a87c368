//! Structured-data extraction: locating Recipe nodes in a page and turning
//! them into validated [`crate::model::Recipe`] values.

mod duration;
mod fallback;
mod locator;
mod normalize;
mod sanitize;
mod validate;

pub use duration::parse_duration;
pub use fallback::{FallbackSource, NoFallback};
pub use locator::{candidates_from_payloads, find_recipe_candidates, is_recipe};
pub use normalize::normalize;
pub use sanitize::{sanitize, sanitize_value};
pub use validate::validate;
