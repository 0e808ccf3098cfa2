//! Interstitial clip and category types

use super::ids::ClipId;
use crate::error::{Result, RtvError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A short interstitial clip (commercial, bumper, station ID)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,

    /// Category name; matched case-insensitively against configured categories
    pub category: String,

    /// Zero when the library could not determine the length
    #[serde(with = "super::seconds", default)]
    pub duration: Duration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Clip {
    pub fn new(id: impl Into<String>, category: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: ClipId::new(id),
            category: category.into(),
            duration,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for display, falling back to the id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

/// A clip category with its relative selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,

    /// Search terms used when acquiring clips for this category
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,

    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Category {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            search_terms: Vec::new(),
            weight,
        }
    }

    /// Reject negative or non-finite weights
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(RtvError::invalid_configuration(format!(
                "category '{}' has invalid weight {}",
                self.name, self.weight
            )));
        }
        Ok(())
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Validate a set of categories: weights and case-insensitive unique names
pub fn validate_categories(categories: &[Category]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for category in categories {
        category.validate()?;
        if !seen.insert(category.name.to_lowercase()) {
            return Err(RtvError::invalid_configuration(format!(
                "duplicate category name '{}'",
                category.name
            )));
        }
    }
    Ok(())
}
