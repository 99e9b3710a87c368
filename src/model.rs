use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;

/// Canonical recipe record produced by every scraping strategy.
///
/// Absent source data is represented by empty strings and empty sequences,
/// never by missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub description: String,
    pub image: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub sectioned_instructions: Vec<SectionedInstruction>,
    pub time: RecipeTime,
    pub servings: String,
}

/// A single step together with the heading of the group it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionedInstruction {
    pub section_title: String,
    pub text: String,
    pub image: String,
}

/// Human-readable durations. Fields missing from the source stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeTime {
    pub prep: String,
    pub cook: String,
    pub active: String,
    pub inactive: String,
    pub ready: String,
    pub total: String,
}

/// Insertion-ordered set used while a list field is being accumulated.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    seen: HashSet<T>,
    items: Vec<T>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Inserts `value` unless an equal value is already present.
    /// Returns whether the value was added.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
