use cinereview_models::{Category, ReviewId};
use cinereview_sources::SourceError;
use std::fmt;
use thiserror::Error;

/// Contract violations on the aggregate. These indicate a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("review {0} is already present")]
    DuplicateId(ReviewId),

    #[error("review {id} is not among the {category}")]
    NotFound { id: ReviewId, category: Category },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    Score,
    Text,
}

impl fmt::Display for ReviewField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewField::Score => f.write_str("score"),
            ReviewField::Text => f.write_str("text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: ReviewField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: ReviewField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("sign in to publish or delete reviews")]
    Unauthenticated,

    #[error(transparent)]
    Transport(#[from] SourceError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl MutationError {
    /// Failures raised locally, before any remote call was attempted
    pub fn is_local(&self) -> bool {
        !matches!(self, MutationError::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to load reviews: {0}")]
    Transport(#[from] SourceError),

    #[error("the movie view has been closed")]
    Closed,

    #[error(transparent)]
    Mutation(#[from] MutationError),
}
