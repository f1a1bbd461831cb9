//! Error type for the store adapter.

/// A failure talking to the backing document store.
///
/// Store failures are fatal for the operation that hit them: the resolver
/// does not retry, it surfaces an internal error. "Row absent" is not an
/// error at this layer — lookups return `Option` and the resolver decides
/// whether absence is a 404.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
