//! Project detail view state machine.
//!
//! ```text
//!            select(id)                select(other)
//!   Closed ─────────────► Open(id) ──────────────► Open(other)
//!     ▲                      │
//!     └──────── close() ─────┘      close() on Closed is a no-op
//! ```
//!
//! Favorites are orthogonal to the open/closed state.

use std::collections::BTreeSet;

use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    /// The id of the project on display.
    Open(DbId),
}

#[derive(Debug, Default)]
pub struct DetailView {
    state: DetailState,
    favorites: BTreeSet<DbId>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DetailState {
        self.state
    }

    pub fn open_project_id(&self) -> Option<DbId> {
        match self.state {
            DetailState::Open(id) => Some(id),
            DetailState::Closed => None,
        }
    }

    /// Show `id`, replacing whatever was open.
    pub fn select(&mut self, id: DbId) {
        self.state = DetailState::Open(id);
    }

    pub fn close(&mut self) {
        self.state = DetailState::Closed;
    }

    /// Flip the favorite mark on `id`. Returns the new membership.
    pub fn toggle_favorite(&mut self, id: DbId) -> bool {
        if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        }
    }

    pub fn is_favorite(&self, id: DbId) -> bool {
        self.favorites.contains(&id)
    }

    /// Favorite ids in ascending order.
    pub fn favorites(&self) -> impl Iterator<Item = DbId> + '_ {
        self.favorites.iter().copied()
    }
}
