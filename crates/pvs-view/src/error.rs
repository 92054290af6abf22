//! Error types for view-model operations

use thiserror::Error;

/// Errors raised by mutations of the headless page view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A mutation addressed a region the view does not carry.
    #[error("unknown view region: {id}")]
    UnknownRegion {
        /// Identifier the caller supplied.
        id: String,
    },

    /// A control referenced by a mutation is not part of the page.
    #[error("unknown control: {0}")]
    UnknownControl(String),
}

impl ViewError {
    /// Convenience constructor for a missing-region error.
    pub fn unknown_region(id: impl Into<String>) -> Self {
        Self::UnknownRegion { id: id.into() }
    }
}
