//! Station: the show pool, playlists, and their position state
//!
//! The station is the persisted aggregate. Generation never touches it
//! directly: callers take a [`PlaylistState`] snapshot, run the engine, and
//! [`Station::commit`] the returned state as a separate step.

use super::clip::{validate_categories, Category};
use super::cursor::{CursorTable, ShowCursor};
use super::history::{HistoryEntry, HISTORY_LIMIT};
use super::ids::{ClipId, PlaylistId, ShowId};
use super::playlist::Playlist;
use super::show::Show;
use super::state::PlaylistState;
use crate::error::{Result, RtvError};
use crate::traits::{ShowMatch, ShowResolver};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Station {
    pub(crate) shows: Vec<Show>,
    pub(crate) categories: Vec<Category>,
    pub(crate) playlists: Vec<Playlist>,
    pub(crate) cursors: CursorTable,
    pub(crate) recent_clips: HashMap<PlaylistId, Vec<ClipId>>,
    pub(crate) default_playlist: Option<PlaylistId>,
    pub(crate) history: Vec<HistoryEntry>,
}

impl Station {
    pub fn new() -> Self {
        Self::default()
    }

    // === Show pool ===

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Look up a show by case-insensitive name
    pub fn show(&self, name: &str) -> Option<&Show> {
        self.shows.iter().find(|show| show.id.matches(name))
    }

    /// Add a show to the global pool
    ///
    /// # Errors
    /// Returns `Duplicate` if a show with the same name (ignoring case) exists
    pub fn add_show(&mut self, show: Show) -> Result<()> {
        if self.show(show.id.as_str()).is_some() {
            return Err(RtvError::Duplicate(format!("show '{}'", show.name)));
        }
        info!("Added show '{}' ({})", show.name, show.library);
        self.shows.push(show);
        Ok(())
    }

    /// Resolve a user-entered name against catalog candidates and add the match
    ///
    /// # Errors
    /// Returns `NotFound` when the resolver has no match, or `Duplicate` when
    /// the matched show is already in the pool
    pub fn resolve_and_add_show(
        &mut self,
        resolver: &dyn ShowResolver,
        query: &str,
        candidates: &[String],
        library: &str,
    ) -> Result<ShowMatch> {
        let found = resolver
            .resolve_show(query, candidates)
            .ok_or_else(|| RtvError::not_found("Show", query))?;

        debug!(
            "Resolved '{}' to '{}' (confidence {:.2})",
            query, found.name, found.confidence
        );
        self.add_show(Show::new(found.name.clone()).with_library(library))?;
        Ok(found)
    }

    /// Remove a show from the pool and from every playlist
    pub fn remove_show(&mut self, name: &str) -> Result<Show> {
        let index = self
            .shows
            .iter()
            .position(|show| show.id.matches(name))
            .ok_or_else(|| RtvError::not_found("Show", name))?;

        let show = self.shows.remove(index);
        for playlist in &mut self.playlists {
            playlist.members.retain(|member| member != &show.id);
        }
        self.cursors.remove_show(&show.id);

        info!("Removed show '{}'", show.name);
        Ok(show)
    }

    /// Enable or disable a show for every playlist
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        self.show_mut(name)?.enabled = enabled;
        Ok(())
    }

    /// Set or clear a show's premiere year
    pub fn set_year(&mut self, name: &str, year: Option<i32>) -> Result<()> {
        self.show_mut(name)?.year = year;
        Ok(())
    }

    fn show_mut(&mut self, name: &str) -> Result<&mut Show> {
        self.shows
            .iter_mut()
            .find(|show| show.id.matches(name))
            .ok_or_else(|| RtvError::not_found("Show", name))
    }

    // === Categories ===

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Replace the category list
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for negative weights or duplicate names
    pub fn set_categories(&mut self, categories: Vec<Category>) -> Result<()> {
        validate_categories(&categories)?;
        self.categories = categories;
        Ok(())
    }

    // === Playlists ===

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Look up a playlist by case-insensitive name
    pub fn playlist(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|playlist| playlist.id.matches(name))
    }

    pub fn default_playlist(&self) -> Option<&PlaylistId> {
        self.default_playlist.as_ref()
    }

    /// Create a playlist; its members start at S01E01
    ///
    /// The first playlist created becomes the default.
    pub fn create_playlist(&mut self, playlist: Playlist) -> Result<()> {
        playlist.validate()?;
        if self.playlist(playlist.name()).is_some() {
            return Err(RtvError::Duplicate(format!("playlist '{}'", playlist.id)));
        }
        for (index, member) in playlist.members.iter().enumerate() {
            if !self.shows.iter().any(|show| &show.id == member) {
                return Err(RtvError::not_found("Show", member.as_str()));
            }
            if playlist.members[..index].contains(member) {
                return Err(RtvError::Duplicate(format!(
                    "'{}' is listed twice in playlist '{}'",
                    member, playlist.id
                )));
            }
        }

        for member in &playlist.members {
            self.cursors
                .set(playlist.id.clone(), member.clone(), ShowCursor::new());
        }
        if self.default_playlist.is_none() {
            self.default_playlist = Some(playlist.id.clone());
        }

        info!("Created playlist '{}'", playlist.id);
        self.playlists.push(playlist);
        Ok(())
    }

    /// Delete a playlist with its cursors and repeat window
    pub fn delete_playlist(&mut self, name: &str) -> Result<Playlist> {
        let index = self.playlist_index(name)?;
        let playlist = self.playlists.remove(index);

        self.cursors.remove_playlist(&playlist.id);
        self.recent_clips.remove(&playlist.id);

        if self.default_playlist.as_ref() == Some(&playlist.id) {
            self.default_playlist = self.playlists.first().map(|p| p.id.clone());
        }

        info!("Deleted playlist '{}'", playlist.id);
        Ok(playlist)
    }

    pub fn set_default_playlist(&mut self, name: &str) -> Result<()> {
        let index = self.playlist_index(name)?;
        self.default_playlist = Some(self.playlists[index].id.clone());
        Ok(())
    }

    /// Add a pool show to a playlist at S01E01
    pub fn add_to_playlist(&mut self, playlist_name: &str, show_name: &str) -> Result<()> {
        let show_id = self
            .show(show_name)
            .map(|show| show.id.clone())
            .ok_or_else(|| RtvError::not_found("Show", show_name))?;
        let index = self.playlist_index(playlist_name)?;
        let playlist = &mut self.playlists[index];

        if playlist.has_member(&show_id) {
            return Err(RtvError::Duplicate(format!(
                "'{}' is already in playlist '{}'",
                show_id, playlist.id
            )));
        }

        playlist.members.push(show_id.clone());
        self.cursors
            .set(playlist.id.clone(), show_id, ShowCursor::new());
        Ok(())
    }

    /// Remove a show from a playlist, dropping its cursor there
    pub fn remove_from_playlist(&mut self, playlist_name: &str, show_name: &str) -> Result<()> {
        let index = self.playlist_index(playlist_name)?;
        let playlist = &mut self.playlists[index];

        let position = playlist
            .members
            .iter()
            .position(|member| member.matches(show_name))
            .ok_or_else(|| {
                RtvError::not_found(format!("Show in playlist '{}'", playlist.id), show_name)
            })?;

        let show_id = playlist.members.remove(position);
        self.cursors.remove(&playlist.id, &show_id);
        Ok(())
    }

    /// Mutable access for editing break settings and ordering
    ///
    /// Membership must go through [`Station::add_to_playlist`] and
    /// [`Station::remove_from_playlist`] so cursors stay in step.
    pub fn update_playlist<F>(&mut self, name: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut Playlist),
    {
        let index = self.playlist_index(name)?;
        let mut edited = self.playlists[index].clone();
        update(&mut edited);

        if edited.members != self.playlists[index].members || edited.id != self.playlists[index].id
        {
            return Err(RtvError::invalid_input(
                "playlist name and members cannot be edited in place",
            ));
        }
        edited.validate()?;
        self.playlists[index] = edited;
        Ok(())
    }

    // === Generation state ===

    pub fn cursors(&self) -> &CursorTable {
        &self.cursors
    }

    /// Copy out the state a generation run needs
    ///
    /// `None` selects the default playlist.
    pub fn snapshot(&self, name: Option<&str>) -> Result<PlaylistState> {
        let playlist = match name {
            Some(name) => self.playlist(name),
            None => self
                .default_playlist
                .as_ref()
                .and_then(|id| self.playlist(id.as_str())),
        }
        .ok_or_else(|| RtvError::not_found("Playlist", name.unwrap_or("(default)")))?;

        Ok(PlaylistState {
            cursors: self.cursors.for_playlist(&playlist.id, &playlist.members),
            recent_clips: self
                .recent_clips
                .get(&playlist.id)
                .cloned()
                .unwrap_or_default(),
            playlist: playlist.clone(),
        })
    }

    /// Persist the cursors and repeat window of a generated state
    ///
    /// Only the playlist's current members are written; a member removed
    /// while the run was in flight does not come back.
    pub fn commit(&mut self, state: PlaylistState) -> Result<()> {
        let index = self.playlist_index(state.playlist.name())?;
        let playlist = &self.playlists[index];

        for member in &playlist.members {
            if let Some(cursor) = state.cursors.get(member) {
                self.cursors.set(playlist.id.clone(), member.clone(), *cursor);
            }
        }
        self.recent_clips
            .insert(playlist.id.clone(), state.recent_clips);

        debug!("Committed generation state for '{}'", playlist.id);
        Ok(())
    }

    // === History ===

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Append a history entry, keeping only the most recent ones
    pub fn record_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    fn playlist_index(&self, name: &str) -> Result<usize> {
        self.playlists
            .iter()
            .position(|playlist| playlist.id.matches(name))
            .ok_or_else(|| RtvError::not_found("Playlist", name))
    }
}
