//! Cache lifecycle of a text block
//!
//! The rebuild policy is a three-state machine, kept separate from the
//! block so the transitions are testable without any rendering:
//!
//! | state               | mutation            | width arrives | rebuilt |
//! |---------------------|---------------------|---------------|---------|
//! | `Clean`             | `Dirty`*            | `Clean`       | -       |
//! | `Dirty`             | `Dirty`*            | `Dirty`       | `Clean` |
//! | `DirtyAwaitingWidth`| `DirtyAwaitingWidth`| `Dirty`       | -       |
//!
//! *a multiline block with no width constraint parks in
//! `DirtyAwaitingWidth` instead.

/// Cache state of a block's rasterized lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyState {
    /// Cached lines match the current text, width constraint, and scale
    Clean,
    /// Cached lines are stale; rebuild on the next measure
    #[default]
    Dirty,
    /// Stale, but a multiline block has no width constraint yet, so a
    /// rebuild would rasterize one oversized line for nothing
    DirtyAwaitingWidth,
}

impl DirtyState {
    /// State after any mutation of text, mask, width constraint, scale,
    /// or the font epoch.
    pub fn on_mutation(multiline: bool, has_width: bool) -> DirtyState {
        if multiline && !has_width {
            DirtyState::DirtyAwaitingWidth
        } else {
            DirtyState::Dirty
        }
    }

    /// Whether a measure call may rebuild right now
    pub fn can_rebuild(self) -> bool {
        self == DirtyState::Dirty
    }

    pub fn is_clean(self) -> bool {
        self == DirtyState::Clean
    }

    /// State after a successful rebuild
    pub fn on_rebuilt(self) -> DirtyState {
        DirtyState::Clean
    }
}
