//! Commercial selection
//!
//! Picks interstitial clips for a break. The category is drawn in proportion
//! to its weight among categories that still have an eligible clip, then a
//! clip is drawn uniformly inside it. Clips inside the repeat window are not
//! eligible; only when the window covers the whole pool does the least
//! recently used clip air again.

use crate::pool::ClipPool;
use crate::window::RepeatWindow;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rtv_core::types::{BlockDuration, BreakConfig, Clip};
use std::time::Duration;
use tracing::debug;

/// Upper bound on clips in one block
const MAX_BLOCK_CLIPS: usize = 64;

/// Chooses clips for breaks and keeps the repeat window current
#[derive(Debug)]
pub struct CommercialSelector<'a> {
    pool: &'a ClipPool,
    window: RepeatWindow,
}

impl<'a> CommercialSelector<'a> {
    pub fn new(pool: &'a ClipPool, window: RepeatWindow) -> Self {
        Self { pool, window }
    }

    pub fn window(&self) -> &RepeatWindow {
        &self.window
    }

    /// Give back the window for persistence
    pub fn into_window(self) -> RepeatWindow {
        self.window
    }

    /// Clips for one break in the given style
    ///
    /// Empty when breaks are disabled or the pool has no clips.
    pub fn select_break<R>(&mut self, config: &BreakConfig, rng: &mut R) -> Vec<Clip>
    where
        R: Rng + ?Sized,
    {
        match config {
            BreakConfig::Single { .. } => self.pick(None, rng).into_iter().collect(),
            BreakConfig::Block { duration, .. } => self.fill_block(duration, rng),
            BreakConfig::Disabled => Vec::new(),
        }
    }

    /// Accumulate clips until the total reaches `min` without passing `max`
    ///
    /// Best effort: the block ends short of `min` once no clip fits the
    /// remaining time. A clip inside the repeat window is never used to top
    /// up a block while an eligible one exists. The first clip is always
    /// taken, even if it alone is longer than `max`.
    fn fill_block<R>(&mut self, range: &BlockDuration, rng: &mut R) -> Vec<Clip>
    where
        R: Rng + ?Sized,
    {
        let first = match self.pick(Some(range.max), rng) {
            Some(clip) => Some(clip),
            None => self.pick(None, rng),
        };
        let Some(first) = first else {
            return Vec::new();
        };

        let mut total = first.duration;
        let mut block = vec![first];

        while total < range.min && block.len() < MAX_BLOCK_CLIPS {
            let remaining = range.max.saturating_sub(total);
            match self.pick(Some(remaining), rng) {
                Some(clip) => {
                    total += clip.duration;
                    block.push(clip);
                }
                None => break,
            }
        }

        debug!(
            "Block of {} clips, {:.0}s (target {}-{}s)",
            block.len(),
            total.as_secs_f64(),
            range.min.as_secs(),
            range.max.as_secs()
        );
        block
    }

    /// Pick one clip no longer than `limit` and record it
    ///
    /// `None` when eligible clips exist but none fits the limit.
    fn pick<R>(&mut self, limit: Option<Duration>, rng: &mut R) -> Option<Clip>
    where
        R: Rng + ?Sized,
    {
        let pool = self.pool;
        let fits = |clip: &Clip| limit.map_or(true, |limit| clip.duration <= limit);
        let any_eligible = pool
            .categories()
            .iter()
            .flat_map(|category| category.clips.iter())
            .any(|clip| !self.window.contains(&clip.id));

        let candidates: Vec<(f64, Vec<&Clip>)> = pool
            .categories()
            .iter()
            .map(|category| {
                let eligible = category
                    .clips
                    .iter()
                    .filter(|clip| fits(*clip) && !self.window.contains(&clip.id))
                    .collect::<Vec<_>>();
                (category.weight, eligible)
            })
            .filter(|(_, eligible)| !eligible.is_empty())
            .collect();

        let chosen = if candidates.is_empty() {
            if any_eligible {
                debug!("No eligible clip fits {:?}", limit);
                return None;
            }
            self.least_recently_used(&fits)
        } else {
            let category = match WeightedIndex::new(candidates.iter().map(|(weight, _)| *weight)) {
                Ok(weights) => weights.sample(rng),
                // Every eligible category has weight zero
                Err(_) => rng.gen_range(0..candidates.len()),
            };
            candidates[category].1.choose(rng).map(|clip| (*clip).clone())
        }?;

        self.window.record(chosen.id.clone());
        Some(chosen)
    }

    fn least_recently_used(&self, fits: &impl Fn(&Clip) -> bool) -> Option<Clip> {
        let clip = self
            .window
            .iter()
            .filter_map(|id| self.pool.get(id))
            .find(|clip| fits(*clip))
            .cloned();
        if let Some(clip) = &clip {
            debug!("No eligible clip, reusing '{}'", clip.id);
        }
        clip
    }
}
