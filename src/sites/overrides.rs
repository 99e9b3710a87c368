use crate::config::{OverrideConfig, OverrideSourceConfig};
use crate::document::Document;
use crate::extract::FallbackSource;
use crate::model::{OrderedSet, Recipe};
use config::ConfigError;
use std::str::FromStr;

/// A recipe field a site override can overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeField {
    Name,
    Description,
    Image,
    Servings,
    Tags,
    Ingredients,
    Instructions,
    Time(TimeField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Prep,
    Cook,
    Active,
    Inactive,
    Ready,
    Total,
}

impl FromStr for RecipeField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "name" => RecipeField::Name,
            "description" => RecipeField::Description,
            "image" => RecipeField::Image,
            "servings" => RecipeField::Servings,
            "tags" => RecipeField::Tags,
            "ingredients" => RecipeField::Ingredients,
            "instructions" => RecipeField::Instructions,
            "time.prep" => RecipeField::Time(TimeField::Prep),
            "time.cook" => RecipeField::Time(TimeField::Cook),
            "time.active" => RecipeField::Time(TimeField::Active),
            "time.inactive" => RecipeField::Time(TimeField::Inactive),
            "time.ready" => RecipeField::Time(TimeField::Ready),
            "time.total" => RecipeField::Time(TimeField::Total),
            other => return Err(format!("unknown recipe field '{}'", other)),
        };
        Ok(field)
    }
}

/// Where an override reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Text of the first element matching the selector, as written
    Text(String),
    /// Attribute of the first element matching the selector
    Attribute { selector: String, name: String },
    /// Trimmed, non-empty texts of every matching element
    AllText(String),
    MetaDescription,
    MetaImage,
}

/// Overwrites one field with a value read from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOverride {
    pub field: RecipeField,
    pub source: FieldSource,
}

enum OverrideValue {
    Single(String),
    List(Vec<String>),
}

impl OverrideValue {
    fn into_single(self) -> String {
        match self {
            OverrideValue::Single(value) => value,
            OverrideValue::List(values) => values.join(" "),
        }
    }

    fn into_list(self) -> Vec<String> {
        match self {
            OverrideValue::Single(value) => vec![value],
            OverrideValue::List(values) => values,
        }
    }
}

impl FieldOverride {
    pub fn new(field: RecipeField, source: FieldSource) -> Self {
        Self { field, source }
    }

    pub fn text(field: RecipeField, selector: &str) -> Self {
        Self::new(field, FieldSource::Text(selector.to_string()))
    }

    /// Applies the override. A source that finds nothing leaves the field
    /// as normalization produced it.
    pub fn apply(&self, recipe: &mut Recipe, document: &Document) {
        if let Some(value) = self.read(document) {
            self.write(recipe, value);
        }
    }

    fn read(&self, document: &Document) -> Option<OverrideValue> {
        let value = match &self.source {
            FieldSource::Text(selector) => OverrideValue::Single(document.select_text(selector)?),
            FieldSource::Attribute { selector, name } => {
                OverrideValue::Single(document.select_attr(selector, name)?)
            }
            FieldSource::AllText(selector) => {
                let texts: Vec<String> = document
                    .select_all_text(selector)
                    .iter()
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
                    .collect();
                if texts.is_empty() {
                    return None;
                }
                OverrideValue::List(texts)
            }
            FieldSource::MetaDescription => {
                let description = document.meta_description();
                if description.is_empty() {
                    return None;
                }
                OverrideValue::Single(description)
            }
            FieldSource::MetaImage => OverrideValue::Single(document.meta_image()?),
        };
        Some(value)
    }

    fn write(&self, recipe: &mut Recipe, value: OverrideValue) {
        match self.field {
            RecipeField::Name => recipe.name = value.into_single(),
            RecipeField::Description => recipe.description = value.into_single(),
            RecipeField::Image => recipe.image = value.into_single(),
            RecipeField::Servings => recipe.servings = value.into_single(),
            RecipeField::Tags => {
                recipe.tags = value
                    .into_list()
                    .into_iter()
                    .filter(|tag| !tag.is_empty())
                    .collect::<OrderedSet<String>>()
                    .into_vec()
            }
            RecipeField::Ingredients => recipe.ingredients = value.into_list(),
            RecipeField::Instructions => {
                recipe.instructions = value
                    .into_list()
                    .into_iter()
                    .collect::<OrderedSet<String>>()
                    .into_vec();
                // The old grouping no longer matches the flat list
                recipe.sectioned_instructions.clear();
            }
            RecipeField::Time(time) => {
                let slot = match time {
                    TimeField::Prep => &mut recipe.time.prep,
                    TimeField::Cook => &mut recipe.time.cook,
                    TimeField::Active => &mut recipe.time.active,
                    TimeField::Inactive => &mut recipe.time.inactive,
                    TimeField::Ready => &mut recipe.time.ready,
                    TimeField::Total => &mut recipe.time.total,
                };
                *slot = value.into_single();
            }
        }
    }
}

impl TryFrom<&OverrideConfig> for FieldOverride {
    type Error = ConfigError;

    fn try_from(config: &OverrideConfig) -> Result<Self, Self::Error> {
        let field = config.field.parse::<RecipeField>().map_err(ConfigError::Message)?;

        let selector = || {
            config.selector.clone().ok_or_else(|| {
                ConfigError::Message(format!("override for '{}' needs a selector", config.field))
            })
        };

        let source = match config.source {
            OverrideSourceConfig::Text => FieldSource::Text(selector()?),
            OverrideSourceConfig::AllText => FieldSource::AllText(selector()?),
            OverrideSourceConfig::Attribute => FieldSource::Attribute {
                selector: selector()?,
                name: config.attribute.clone().ok_or_else(|| {
                    ConfigError::Message(format!(
                        "attribute override for '{}' needs an attribute name",
                        config.field
                    ))
                })?,
            },
            OverrideSourceConfig::MetaDescription => FieldSource::MetaDescription,
            OverrideSourceConfig::MetaImage => FieldSource::MetaImage,
        };

        Ok(Self { field, source })
    }
}
