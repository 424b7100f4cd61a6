//! Error Types
//!
//! Validation failures are reported synchronously to the user and never
//! mutate state. Remote and storage failures live next to their modules
//! ([`crate::assistant::GatewayError`], [`crate::persistence::StorageError`]).

use thiserror::Error;

/// A required field or precondition is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Saving a joke needs both a premise and a punchline
    #[error("premise and punchline are required to save a bit")]
    MissingPremiseOrPunchline,

    /// Refining a joke needs a premise
    #[error("a premise is required to refine a bit")]
    MissingPremise,

    /// Diary entries must have text
    #[error("a diary entry needs some text")]
    EmptyDiaryText,

    /// Bulk import needs at least one selected entry
    #[error("select at least one diary entry to import")]
    EmptySelection,
}
