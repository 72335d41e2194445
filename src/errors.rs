use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Errors that can occur while building a derived view.
///
/// The HTTP layer in `api.rs` owns the translation into response bodies;
/// several endpoints phrase the same error differently, so no endpoint
/// wording lives here.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Caller-supplied round index was non-numeric or not positive
    #[error("invalid round index")]
    InvalidIndex,

    /// Round index out of range, or the resolved war document is missing upstream
    #[error("war round not found")]
    RoundNotFound,

    /// Upstream returned 404 for a clan or league-group lookup
    #[error("not found upstream")]
    UpstreamNotFound,

    /// Upstream returned 403; only war logs are ever private
    #[error("forbidden upstream")]
    UpstreamForbidden,

    /// Any other upstream status or transport failure
    #[error("upstream request failed: {0}")]
    UpstreamFailure(String),
}
