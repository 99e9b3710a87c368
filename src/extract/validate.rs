use crate::error::ValidationError;
use crate::model::Recipe;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
enum Expected {
    NonEmptyString,
    String,
    StringList,
    SectionList,
    Time,
}

/// The fixed shape every returned recipe must have.
const RECIPE_SCHEMA: [(&str, Expected); 9] = [
    ("name", Expected::NonEmptyString),
    ("description", Expected::String),
    ("image", Expected::String),
    ("tags", Expected::StringList),
    ("ingredients", Expected::StringList),
    ("instructions", Expected::StringList),
    ("sectionedInstructions", Expected::SectionList),
    ("time", Expected::Time),
    ("servings", Expected::String),
];

const SECTION_FIELDS: [&str; 3] = ["sectionTitle", "text", "image"];
const TIME_FIELDS: [&str; 6] = ["prep", "cook", "active", "inactive", "ready", "total"];

/// Checks `recipe` against the recipe schema.
///
/// All violations are reported together; nothing is repaired.
pub fn validate(recipe: Recipe) -> Result<Recipe, ValidationError> {
    let json = match serde_json::to_value(&recipe) {
        Ok(Value::Object(json)) => json,
        Ok(_) => return Err(violation("recipe: must serialize to an object")),
        Err(e) => return Err(violation(&format!("recipe: {}", e))),
    };

    let violations = check_schema(&json);
    if violations.is_empty() {
        Ok(recipe)
    } else {
        Err(ValidationError { violations })
    }
}

fn check_schema(json: &Map<String, Value>) -> Vec<String> {
    let mut violations = Vec::new();

    for (field, expected) in RECIPE_SCHEMA {
        match json.get(field) {
            None => violations.push(format!("{}: is required", field)),
            Some(value) => check_field(field, value, expected, &mut violations),
        }
    }

    violations
}

fn check_field(field: &str, value: &Value, expected: Expected, violations: &mut Vec<String>) {
    match expected {
        Expected::NonEmptyString => match value.as_str() {
            Some(s) if !s.trim().is_empty() => {}
            Some(_) => violations.push(format!("{}: must not be empty", field)),
            None => violations.push(format!("{}: must be a string", field)),
        },
        Expected::String => {
            if !value.is_string() {
                violations.push(format!("{}: must be a string", field));
            }
        }
        Expected::StringList => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        violations.push(format!("{}[{}]: must be a string", field, i));
                    }
                }
            }
            None => violations.push(format!("{}: must be an array", field)),
        },
        Expected::SectionList => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_record(&format!("{}[{}]", field, i), item, &SECTION_FIELDS, violations);
                }
            }
            None => violations.push(format!("{}: must be an array", field)),
        },
        Expected::Time => check_record(field, value, &TIME_FIELDS, violations),
    }
}

fn check_record(path: &str, value: &Value, fields: &[&str], violations: &mut Vec<String>) {
    let Some(record) = value.as_object() else {
        violations.push(format!("{}: must be an object", path));
        return;
    };

    for field in fields {
        match record.get(*field) {
            Some(Value::String(_)) => {}
            Some(_) => violations.push(format!("{}.{}: must be a string", path, field)),
            None => violations.push(format!("{}.{}: is required", path, field)),
        }
    }
}

fn violation(message: &str) -> ValidationError {
    ValidationError {
        violations: vec![message.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_recipe_passes_unchanged() {
        let recipe = Recipe {
            name: "Pie".to_string(),
            ingredients: vec!["1 egg".to_string()],
            ..Default::default()
        };
        assert_eq!(validate(recipe.clone()).unwrap(), recipe);
    }

    #[test]
    fn test_empty_name_fails() {
        let err = validate(Recipe::default()).unwrap_err();
        assert_eq!(err.violations, vec!["name: must not be empty"]);

        let blank = Recipe {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(validate(blank).is_err());
    }

    #[test]
    fn test_schema_reports_every_violation() {
        let json = json!({
            "name": 5,
            "description": "",
            "tags": ["a", 1],
            "ingredients": "flour",
            "instructions": [],
            "sectionedInstructions": [{"sectionTitle": "A", "text": "B"}],
            "time": {"prep": "", "cook": "", "active": "", "inactive": "", "ready": ""},
            "servings": ""
        });
        let violations = check_schema(json.as_object().unwrap());
        assert_eq!(
            violations,
            vec![
                "name: must be a string",
                "image: is required",
                "tags[1]: must be a string",
                "ingredients: must be an array",
                "sectionedInstructions[0].image: is required",
                "time.total: is required",
            ]
        );
    }
}
