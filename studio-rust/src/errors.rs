use crate::{reference::MAX_REFERENCE_IMAGES, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Image model error: {0}")]
    Model(#[from] genimage_sdk::ImageModelError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Neither a user-supplied nor a default API key is configured.
    #[error("No API credential is configured")]
    MissingCredential,
    /// A remote call is already in flight for this session.
    #[error("A request is already in flight")]
    Busy,
    /// The session is locked; a new generation requires an explicit reset.
    #[error("The session is locked; reset it before generating a new logo")]
    SessionLocked,
    #[error("No generated logo is active")]
    NoSession,
    /// The service responded without a usable payload.
    #[error("The service returned no usable result")]
    EmptyResult,
    #[error("No history entry at index {0}")]
    UnknownHistoryEntry(usize),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Invariant: {0}")]
    Invariant(String),
}

/// Local input validation. These never reach the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a description for your logo")]
    EmptyPrompt,
    #[error("Choose a style for your logo")]
    MissingStyle,
    #[error("Choose an output format")]
    MissingFormat,
    #[error("At most {} reference images can be attached", MAX_REFERENCE_IMAGES)]
    TooManyReferences,
}
