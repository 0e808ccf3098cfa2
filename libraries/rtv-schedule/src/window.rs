//! Repeat-window tracking
//!
//! Maintains a bounded history of recently used clips so breaks do not
//! repeat a clip until `min_gap` other clips have aired.

use rtv_core::types::ClipId;
use std::collections::VecDeque;

/// Recently used clip ids with bounded size
///
/// Ring buffer: the oldest entry is discarded once the window is full. An id
/// appears at most once; using it again moves it to the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatWindow {
    /// Most recent = back
    recent: VecDeque<ClipId>,

    max_size: usize,
}

impl RepeatWindow {
    /// Create an empty window; a size of zero tracks nothing
    pub fn new(max_size: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Restore a persisted window (oldest first)
    ///
    /// Repeated ids keep their latest position and the oldest entries are
    /// dropped if the list is longer than `max_size`.
    pub fn from_recent(recent: impl IntoIterator<Item = ClipId>, max_size: usize) -> Self {
        let mut window = Self::new(max_size);
        for id in recent {
            window.record(id);
        }
        window
    }

    /// Record a clip as just used
    pub fn record(&mut self, id: ClipId) {
        if self.max_size == 0 {
            return;
        }

        if let Some(position) = self.recent.iter().position(|recent| recent == &id) {
            self.recent.remove(position);
        }
        if self.recent.len() >= self.max_size {
            self.recent.pop_front();
        }
        self.recent.push_back(id);
    }

    /// Whether a clip is still inside the window
    pub fn contains(&self, id: &ClipId) -> bool {
        self.recent.contains(id)
    }

    /// Entries from least to most recently used
    pub fn iter(&self) -> impl Iterator<Item = &ClipId> {
        self.recent.iter()
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set maximum window size
    ///
    /// If new size is smaller than current, oldest entries are discarded
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        while self.recent.len() > max_size {
            self.recent.pop_front();
        }
    }

    /// Persistable form, oldest first
    pub fn into_vec(self) -> Vec<ClipId> {
        self.recent.into()
    }
}
