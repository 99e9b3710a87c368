use super::duration::parse_duration;
use super::fallback::FallbackSource;
use super::sanitize::{sanitize, sanitize_value};
use crate::error::NormalizeError;
use crate::model::{OrderedSet, Recipe, RecipeTime, SectionedInstruction};
use serde::Deserialize;
use serde_json::Value;

/// The shapes a JSON-LD Recipe node is known to take, field by field.
/// Every union ends in a catch-all so an unfamiliar shape is ignored
/// instead of rejecting the whole node.
#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: Option<Value>,
    description: Option<DescriptionType>,
    image: Option<ImageType>,
    url: Option<Value>,
    #[serde(rename = "thumbnailUrl")]
    thumbnail_url: Option<StringOrList>,
    keywords: Option<StringOrList>,
    #[serde(rename = "recipeCuisine")]
    recipe_cuisine: Option<StringOrList>,
    #[serde(rename = "recipeCategory")]
    recipe_category: Option<StringOrList>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<StringOrList>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "prepTime")]
    prep_time: Option<Value>,
    #[serde(rename = "cookTime")]
    cook_time: Option<Value>,
    #[serde(rename = "totalTime")]
    total_time: Option<Value>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<StringOrList>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    List(Vec<Value>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    #[serde(rename = "@type")]
    kind: Option<Value>,
    url: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageEntry {
    String(String),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageEntry>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionEntry>),
    ItemList(HowToNode),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionEntry {
    String(String),
    Node(HowToNode),
    Other(Value),
}

/// A `HowToStep`, `HowToSection` or `ItemList` object.
#[derive(Debug, Deserialize)]
struct HowToNode {
    #[serde(rename = "@type")]
    kind: Option<Value>,
    name: Option<Value>,
    text: Option<Value>,
    image: Option<ImageType>,
    #[serde(rename = "itemListElement")]
    item_list_element: Option<Vec<InstructionEntry>>,
}

/// Maps one candidate Recipe node onto the canonical [`Recipe`].
///
/// Pure apart from reads against `fallback`, which supplies the description
/// and image when the node has none.
pub fn normalize(
    candidate: &Value,
    fallback: &dyn FallbackSource,
) -> Result<Recipe, NormalizeError> {
    if !candidate.is_object() {
        return Err(NormalizeError::NotAnObject);
    }
    let node: JsonLdRecipe = serde_json::from_value(candidate.clone())?;

    let (instructions, sectioned_instructions) = node.instructions()?;

    Ok(Recipe {
        name: sanitize_value(node.name.as_ref()),
        description: node.description(fallback),
        image: node.image(fallback),
        tags: node.tags(),
        ingredients: node.ingredients(),
        instructions,
        sectioned_instructions,
        time: RecipeTime {
            prep: duration_of(node.prep_time.as_ref()),
            cook: duration_of(node.cook_time.as_ref()),
            total: duration_of(node.total_time.as_ref()),
            ..Default::default()
        },
        servings: node.servings(),
    })
}

impl JsonLdRecipe {
    fn description(&self, fallback: &dyn FallbackSource) -> String {
        match &self.description {
            Some(DescriptionType::String(desc)) if !desc.is_empty() => sanitize(desc),
            Some(DescriptionType::Object(desc)) => sanitize(&desc.text),
            _ => fallback.meta_description(),
        }
    }

    fn image(&self, fallback: &dyn FallbackSource) -> String {
        self.image_from_field()
            .or_else(|| self.thumbnail())
            .or_else(|| fallback.meta_image())
            .unwrap_or_default()
    }

    fn image_from_field(&self) -> Option<String> {
        match self.image.as_ref()? {
            ImageType::String(url) => non_empty(url),
            // Only honoured when the recipe node itself carries a url
            ImageType::Object(obj) if obj.is_image_object() && is_truthy(self.url.as_ref()) => {
                Some(obj.url().unwrap_or_default())
            }
            ImageType::Multiple(images) => match images.first()? {
                ImageEntry::String(url) => non_empty(url),
                ImageEntry::Object(obj) if obj.is_image_object() => obj.url(),
                _ => None,
            },
            _ => None,
        }
    }

    fn thumbnail(&self) -> Option<String> {
        match self.thumbnail_url.as_ref()? {
            StringOrList::String(url) => non_empty(url),
            StringOrList::List(urls) => urls.first().and_then(Value::as_str).map(str::to_string),
            StringOrList::Other(_) => None,
        }
    }

    fn tags(&self) -> Vec<String> {
        let mut raw: Vec<&str> = Vec::new();

        match &self.keywords {
            Some(StringOrList::String(keywords)) => raw.extend(keywords.split(',')),
            Some(StringOrList::List(keywords)) => {
                raw.extend(keywords.iter().filter_map(Value::as_str))
            }
            _ => {}
        }

        match &self.recipe_cuisine {
            Some(StringOrList::String(cuisine)) => raw.push(cuisine),
            Some(StringOrList::List(cuisines)) => {
                raw.extend(cuisines.iter().filter_map(Value::as_str))
            }
            _ => {}
        }

        match &self.recipe_category {
            Some(StringOrList::String(category)) => {
                let separator = if category.contains('|') { '|' } else { ',' };
                raw.extend(category.split(separator));
            }
            Some(StringOrList::List(categories)) => {
                raw.extend(categories.iter().filter_map(Value::as_str))
            }
            _ => {}
        }

        raw.into_iter()
            .map(sanitize)
            .filter(|tag| !tag.is_empty())
            .collect::<OrderedSet<String>>()
            .into_vec()
    }

    /// One entry per source line, kept even when it sanitizes to "".
    fn ingredients(&self) -> Vec<String> {
        match &self.recipe_ingredient {
            Some(StringOrList::List(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(sanitize)
                .collect(),
            Some(StringOrList::String(items)) => {
                items.split(',').map(|item| sanitize(item.trim())).collect()
            }
            _ => Vec::new(),
        }
    }

    fn instructions(&self) -> Result<(Vec<String>, Vec<SectionedInstruction>), NormalizeError> {
        let mut builder = InstructionsBuilder::default();

        match &self.recipe_instructions {
            Some(RecipeInstructions::String(text)) => builder.add_text(sanitize(text)),
            Some(RecipeInstructions::Multiple(entries)) => {
                for entry in entries {
                    builder.add_entry(entry);
                }
            }
            Some(RecipeInstructions::ItemList(list))
                if list.is_a("ItemList") && list.item_list_element.is_some() =>
            {
                for (index, section) in list.item_list_element.iter().flatten().enumerate() {
                    builder.add_item_list_section(index, section)?;
                }
            }
            _ => {}
        }

        Ok(builder.finish())
    }

    fn servings(&self) -> String {
        match &self.recipe_yield {
            Some(StringOrList::String(servings)) => servings.clone(),
            Some(StringOrList::List(servings)) => servings
                .first()
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

impl ImageObject {
    fn is_image_object(&self) -> bool {
        has_type(self.kind.as_ref(), "ImageObject")
    }

    fn url(&self) -> Option<String> {
        self.url.as_ref().and_then(Value::as_str).map(str::to_string)
    }
}

impl ImageType {
    /// Image attached to a single step.
    fn step_url(&self) -> String {
        match self {
            ImageType::String(url) => url.clone(),
            ImageType::Object(obj) => obj.url().unwrap_or_default(),
            ImageType::Multiple(images) => match images.first() {
                Some(ImageEntry::String(url)) => url.clone(),
                Some(ImageEntry::Object(obj)) => obj.url().unwrap_or_default(),
                _ => String::new(),
            },
            ImageType::Other(_) => String::new(),
        }
    }
}

impl HowToNode {
    fn is_a(&self, kind: &str) -> bool {
        has_type(self.kind.as_ref(), kind)
    }

    fn text(&self) -> String {
        sanitize_value(self.text.as_ref())
    }

    fn title(&self) -> String {
        sanitize_value(self.name.as_ref())
    }

    fn image(&self) -> String {
        self.image
            .as_ref()
            .map(ImageType::step_url)
            .unwrap_or_default()
    }
}

/// Accumulates flat and sectioned steps. Flat steps are deduplicated on
/// exact text; sectioned steps only when title, text and image all match.
#[derive(Default)]
struct InstructionsBuilder {
    flat: OrderedSet<String>,
    sectioned: OrderedSet<SectionedInstruction>,
}

impl InstructionsBuilder {
    fn add_text(&mut self, text: String) {
        if !text.is_empty() {
            self.flat.insert(text);
        }
    }

    fn add_step(&mut self, section_title: String, text: String, image: String) {
        if text.is_empty() {
            return;
        }
        self.flat.insert(text.clone());
        self.sectioned.insert(SectionedInstruction {
            section_title,
            text,
            image,
        });
    }

    fn add_entry(&mut self, entry: &InstructionEntry) {
        match entry {
            InstructionEntry::String(text) => self.add_text(sanitize(text)),
            InstructionEntry::Node(node) if node.is_a("HowToSection") => {
                let title = node.title();
                for step in node.item_list_element.iter().flatten() {
                    self.add_section_step(&title, step);
                }
            }
            InstructionEntry::Node(node) if node.is_a("HowToStep") || node.kind.is_none() => {
                self.add_step(node.title(), node.text(), node.image());
            }
            _ => {}
        }
    }

    /// A member of an `ItemList`: a named group that must list its steps.
    fn add_item_list_section(
        &mut self,
        index: usize,
        section: &InstructionEntry,
    ) -> Result<(), NormalizeError> {
        let InstructionEntry::Node(section) = section else {
            return Err(NormalizeError::MalformedSection { index });
        };
        let steps = section
            .item_list_element
            .as_ref()
            .ok_or(NormalizeError::MalformedSection { index })?;

        let title = section.title();
        for step in steps {
            self.add_section_step(&title, step);
        }
        Ok(())
    }

    fn add_section_step(&mut self, title: &str, step: &InstructionEntry) {
        match step {
            InstructionEntry::String(text) => {
                self.add_step(title.to_string(), sanitize(text), String::new())
            }
            InstructionEntry::Node(node) => {
                self.add_step(title.to_string(), node.text(), node.image())
            }
            InstructionEntry::Other(_) => {}
        }
    }

    fn finish(self) -> (Vec<String>, Vec<SectionedInstruction>) {
        (self.flat.into_vec(), self.sectioned.into_vec())
    }
}

fn duration_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(token)) if !token.is_empty() => parse_duration(token),
        _ => String::new(),
    }
}

fn has_type(kind: Option<&Value>, expected: &str) -> bool {
    match kind {
        Some(Value::String(kind)) => kind.eq_ignore_ascii_case(expected),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| kind.eq_ignore_ascii_case(expected)),
        _ => false,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
