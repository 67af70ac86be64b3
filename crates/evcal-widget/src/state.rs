//! Lifecycle of the live calendar view.
//!
//! The view is created by the first Load and stays active for the rest of
//! the session. Used by SyncController.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Uninitialized,
    Active,
}

impl ViewState {
    /// True if Replace, Merge, Upsert and Delete should touch the view.
    pub fn accepts_updates(self) -> bool {
        matches!(self, ViewState::Active)
    }

    /// State after a Load. Loading again keeps the view active.
    pub fn on_load(self) -> Self {
        ViewState::Active
    }
}
