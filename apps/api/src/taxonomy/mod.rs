//! Keyword Taxonomy: category → subcategory → keyword table used to classify free text.
//!
//! The taxonomy is an immutable value built once at startup and shared via `Arc`;
//! extractors receive it at construction so tests can inject reduced vocabularies.
//!
//! Matching is case-insensitive SUBSTRING containment on lower-cased text, not token
//! matching. A short keyword inside an unrelated word is a false positive
//! (`"go"` in `"google"`, `"ng"` in `"testing"`). That limitation is accepted.

pub mod catalog;
pub mod patterns;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub use catalog::default_taxonomy;

/// A recognised technology: the label reported when any of its keywords appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub label: String,
    /// Lower-cased search keys.
    pub keywords: Vec<String>,
}

impl Term {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// A term whose only keyword is its own label.
    pub fn literal(label: &str) -> Self {
        Self::new(label, &[label])
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    pub name: String,
    pub terms: Vec<Term>,
}

impl Subcategory {
    pub fn new(name: &str, terms: Vec<Term>) -> Self {
        Self {
            name: name.to_string(),
            terms,
        }
    }

    /// Every keyword of every term, in table order.
    pub fn keywords(&self) -> Vec<&str> {
        self.terms
            .iter()
            .flat_map(|t| t.keywords.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// The (subcategory → keyword list) pairs for a category.
    pub fn keyword_lists(&self, category: &str) -> Option<Vec<(&str, Vec<&str>)>> {
        self.category(category).map(|c| {
            c.subcategories
                .iter()
                .map(|s| (s.name.as_str(), s.keywords()))
                .collect()
        })
    }

    /// Labels of every term with at least one keyword contained in `text`.
    pub fn find_technologies(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.terms()
            .filter(|t| t.matches(&lowered))
            .map(|t| t.label.clone())
            .collect()
    }

    /// Reverse lookup: category name → detected technologies that are labels in it.
    ///
    /// Best-effort multi-membership: a label present in several categories is listed
    /// under each of them. Empty categories are omitted.
    pub fn categorize<'a, I>(&self, technologies: I) -> BTreeMap<String, Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for tech in technologies {
            for category in &self.categories {
                let member = category
                    .subcategories
                    .iter()
                    .flat_map(|s| s.terms.iter())
                    .any(|t| t.label == tech);
                if member {
                    categories
                        .entry(category.name.clone())
                        .or_default()
                        .push(tech.to_string());
                }
            }
        }
        categories
    }

    fn terms(&self) -> impl Iterator<Item = &Term> {
        self.categories
            .iter()
            .flat_map(|c| c.subcategories.iter())
            .flat_map(|s| s.terms.iter())
    }
}
