use thiserror::Error;

/// Client-side precondition failures. These never reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a search query.")]
    EmptyQuery,
    #[error("Top K must be between 1 and 200.")]
    TopKOutOfRange { value: u32 },
    #[error("All fields are required.")]
    MissingFields,
}
