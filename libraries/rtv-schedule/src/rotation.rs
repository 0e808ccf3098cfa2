//! Round-robin episode rotation
//!
//! Each active show takes one turn in order, airing its next episode. A show
//! leaves the rotation when its last episode has aired or when it is
//! disabled; the remaining shows keep their order.

use crate::cursor::EpisodeListing;
use rtv_core::types::{Episode, Show, ShowCursor, ShowId, SortBy};
use std::cmp::Reverse;

/// Order a playlist's shows for rotation
///
/// Stable: shows that compare equal keep their configured order. Shows
/// without a premiere year sort last in both year orders.
pub fn sort_members(shows: &mut [&Show], sort_by: SortBy) {
    match sort_by {
        SortBy::ConfigOrder => {}
        SortBy::PremiereYear => shows.sort_by_key(|show| (show.year.is_none(), show.year)),
        SortBy::PremiereYearDesc => {
            shows.sort_by_key(|show| (show.year.is_none(), Reverse(show.year)));
        }
        SortBy::Alphabetical => shows.sort_by_key(|show| show.name.to_lowercase()),
    }
}

/// A show in the rotation and where it stands
#[derive(Debug, Clone)]
pub struct RotationSlot<'a> {
    pub show: ShowId,
    pub show_name: String,
    pub listing: &'a EpisodeListing,

    /// Listing index of the next episode to air
    pub next: usize,
}

/// One emitted episode
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub show: ShowId,
    pub show_name: String,
    pub episode: Episode,

    /// Cursor after this turn
    pub cursor: ShowCursor,

    /// This turn aired the show's last available episode
    pub exhausted: bool,
}

/// Iterator over turns of the active shows
#[derive(Debug, Clone)]
pub struct RoundRobin<'a> {
    slots: Vec<RotationSlot<'a>>,

    /// Slot that takes the next turn
    pointer: usize,
}

impl<'a> RoundRobin<'a> {
    /// Start a rotation at the first slot
    pub fn new(slots: Vec<RotationSlot<'a>>) -> Self {
        Self { slots, pointer: 0 }
    }

    /// Shows still in the rotation, in order
    pub fn active(&self) -> impl Iterator<Item = &ShowId> {
        self.slots.iter().map(|slot| &slot.show)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Take a show out of the rotation
    ///
    /// The show that would have aired next still does, unless it is the one
    /// removed. Returns `false` if the show was not in the rotation.
    pub fn disable(&mut self, show: &ShowId) -> bool {
        let Some(position) = self.slots.iter().position(|slot| &slot.show == show) else {
            return false;
        };
        self.remove(position);
        true
    }

    fn remove(&mut self, position: usize) {
        self.slots.remove(position);
        if position < self.pointer {
            self.pointer -= 1;
        }
        if self.pointer >= self.slots.len() {
            self.pointer = 0;
        }
    }
}

impl<'a> Iterator for RoundRobin<'a> {
    type Item = Turn;

    fn next(&mut self) -> Option<Turn> {
        let position = self.pointer;
        let slot = self.slots.get_mut(position)?;

        // Slots are only built for cursors that checked as ready
        let episode = slot.listing.get(slot.next)?.clone();
        let cursor = slot.listing.advance(slot.next);
        let turn = Turn {
            show: slot.show.clone(),
            show_name: slot.show_name.clone(),
            episode,
            cursor,
            exhausted: cursor.exhausted,
        };

        if cursor.exhausted {
            self.remove(position);
        } else {
            slot.next += 1;
            self.pointer = (position + 1) % self.slots.len();
        }

        Some(turn)
    }
}
