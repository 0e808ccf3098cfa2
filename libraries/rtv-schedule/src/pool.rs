//! Clip pool index
//!
//! An immutable, in-memory view of the clip library for one run: clips
//! grouped by category, each category carrying its selection weight.

use crate::error::Result;
use rtv_core::types::{validate_categories, Category, Clip, ClipId};
use rtv_core::ClipLibrary;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, warn};

/// Length assumed for clips whose duration is unknown
pub const DEFAULT_CLIP_DURATION: Duration = Duration::from_secs(30);

/// Weight of a category that has clips but no configuration entry
pub const DEFAULT_CATEGORY_WEIGHT: f64 = 1.0;

/// Clips of one category
#[derive(Debug, Clone)]
pub struct PoolCategory {
    /// Name as reported by the library
    pub name: String,

    pub weight: f64,

    pub clips: Vec<Clip>,
}

/// All clips available to a run
#[derive(Debug, Clone, Default)]
pub struct ClipPool {
    /// Ordered by lowercase name so selection is reproducible for a seed
    categories: Vec<PoolCategory>,

    /// Clip id to (category index, clip index)
    index: HashMap<ClipId, (usize, usize)>,
}

impl ClipPool {
    /// Pool with no clips; breaks come out empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the pool from a library snapshot
    ///
    /// Category names match configured categories case-insensitively.
    /// Clips with a zero duration are given [`DEFAULT_CLIP_DURATION`]. If the
    /// same clip id appears twice, the first occurrence wins.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for negative or non-finite weights
    pub fn new(clips: BTreeMap<String, Vec<Clip>>, categories: &[Category]) -> Result<Self> {
        validate_categories(categories)?;

        let weights: HashMap<String, f64> = categories
            .iter()
            .map(|category| (category.name.to_lowercase(), category.weight))
            .collect();

        let mut grouped: BTreeMap<String, PoolCategory> = BTreeMap::new();
        let mut seen: HashMap<ClipId, String> = HashMap::new();

        for (name, group) in clips {
            let key = name.to_lowercase();
            for mut clip in group {
                if let Some(first) = seen.get(&clip.id) {
                    warn!(
                        "Clip '{}' listed in both '{}' and '{}'; keeping the first",
                        clip.id, first, name
                    );
                    continue;
                }
                seen.insert(clip.id.clone(), name.clone());

                if clip.duration.is_zero() {
                    clip.duration = DEFAULT_CLIP_DURATION;
                }

                grouped
                    .entry(key.clone())
                    .or_insert_with(|| PoolCategory {
                        name: name.clone(),
                        weight: weights
                            .get(&key)
                            .copied()
                            .unwrap_or(DEFAULT_CATEGORY_WEIGHT),
                        clips: Vec::new(),
                    })
                    .clips
                    .push(clip);
            }
        }

        let categories: Vec<PoolCategory> = grouped
            .into_values()
            .filter(|category| !category.clips.is_empty())
            .collect();

        let mut index = HashMap::new();
        for (category_idx, category) in categories.iter().enumerate() {
            for (clip_idx, clip) in category.clips.iter().enumerate() {
                index.insert(clip.id.clone(), (category_idx, clip_idx));
            }
        }

        debug!(
            "Clip pool: {} clips in {} categories",
            index.len(),
            categories.len()
        );

        Ok(Self { categories, index })
    }

    /// Snapshot a clip library into a pool
    pub fn from_library(library: &dyn ClipLibrary, categories: &[Category]) -> Result<Self> {
        Self::new(library.list_clips()?, categories)
    }

    pub fn categories(&self) -> &[PoolCategory] {
        &self.categories
    }

    pub fn get(&self, id: &ClipId) -> Option<&Clip> {
        self.index
            .get(id)
            .map(|&(category, clip)| &self.categories[category].clips[clip])
    }

    pub fn contains(&self, id: &ClipId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of distinct clips
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtv_core::RtvError;

    fn clip(id: &str, category: &str, secs: u64) -> Clip {
        Clip::new(id, category, Duration::from_secs(secs))
    }

    #[test]
    fn groups_case_insensitively_and_applies_weights() {
        let mut library = BTreeMap::new();
        library.insert("Toys".to_string(), vec![clip("a", "Toys", 30)]);
        library.insert("toys".to_string(), vec![clip("b", "toys", 15)]);
        library.insert("Cereal".to_string(), vec![clip("c", "Cereal", 20)]);

        let pool = ClipPool::new(library, &[Category::new("TOYS", 3.0)]).unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.categories().len(), 2);
        let toys = pool
            .categories()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case("toys"))
            .unwrap();
        assert_eq!(toys.clips.len(), 2);
        assert_eq!(toys.weight, 3.0);

        let cereal = pool.categories().iter().find(|c| c.name == "Cereal").unwrap();
        assert_eq!(cereal.weight, DEFAULT_CATEGORY_WEIGHT);
    }

    #[test]
    fn unknown_duration_counts_as_default() {
        let mut library = BTreeMap::new();
        library.insert("bumpers".to_string(), vec![clip("a", "bumpers", 0)]);

        let pool = ClipPool::new(library, &[]).unwrap();
        assert_eq!(
            pool.get(&ClipId::new("a")).unwrap().duration,
            DEFAULT_CLIP_DURATION
        );
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut library = BTreeMap::new();
        library.insert("a-first".to_string(), vec![clip("same", "a-first", 10)]);
        library.insert("b-second".to_string(), vec![clip("same", "b-second", 99)]);

        let pool = ClipPool::new(library, &[]).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.categories().len(), 1);
        assert_eq!(
            pool.get(&ClipId::new("same")).unwrap().duration,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn negative_weight_is_configuration_error() {
        let err = ClipPool::new(BTreeMap::new(), &[Category::new("toys", -1.0)]).unwrap_err();
        assert!(matches!(
            err,
            crate::ScheduleError::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn library_failure_propagates() {
        struct Broken;
        impl ClipLibrary for Broken {
            fn list_clips(&self) -> rtv_core::Result<BTreeMap<String, Vec<Clip>>> {
                Err(RtvError::catalog("library offline"))
            }
        }

        let err = ClipPool::from_library(&Broken, &[]).unwrap_err();
        assert!(err.to_string().contains("library offline"));
    }

    #[test]
    fn empty_groups_are_dropped() {
        let mut library = BTreeMap::new();
        library.insert("empty".to_string(), Vec::new());
        let pool = ClipPool::new(library, &[]).unwrap();
        assert!(pool.is_empty());
        assert!(pool.categories().is_empty());
    }
}
