use pawpost_client::client::ApiError;
use thiserror::Error;

/// What went wrong in a store operation, keyed by the kind of operation.
///
/// The display form is what stores record as their user-facing error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Loading failed: {0}")]
    Fetch(#[source] ApiError),
    #[error("Saving failed: {0}")]
    Mutation(#[source] ApiError),
    #[error("Like could not be updated: {0}")]
    LikeToggle(#[source] ApiError),
    #[error("Report could not be sent: {0}")]
    Report(#[source] ApiError),
}

impl StoreError {
    #[must_use]
    pub fn api_error(&self) -> &ApiError {
        match self {
            StoreError::Fetch(err)
            | StoreError::Mutation(err)
            | StoreError::LikeToggle(err)
            | StoreError::Report(err) => err,
        }
    }
}
