use async_trait::async_trait;
use cinereview_models::{Actor, ActorProfile, MovieId, MoviePoster, NewReview, Review, ReviewId, ViewerIdentity};

use crate::error::SourceError;

/// Reviews of one movie as returned by the store, already split by category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedReviews {
    pub critics: Vec<Review>,
    pub spectators: Vec<Review>,
}

impl FetchedReviews {
    /// All reviews in store order, critics first
    pub fn into_flat(self) -> Vec<Review> {
        let mut all = self.critics;
        all.extend(self.spectators);
        all
    }

    pub fn len(&self) -> usize {
        self.critics.len() + self.spectators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.critics.is_empty() && self.spectators.is_empty()
    }
}

/// Store acknowledgement of a newly created review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedReview {
    pub id: ReviewId,
    pub message: String,
}

/// Remote authority for review records, keyed by movie
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn fetch_reviews(&self, movie_id: &MovieId) -> Result<FetchedReviews, SourceError>;

    async fn create_review(&self, review: &NewReview) -> Result<CreatedReview, SourceError>;

    /// Returns the store's confirmation message
    async fn delete_review(&self, id: &ReviewId, movie_id: &MovieId) -> Result<String, SourceError>;
}

/// Resolves who is using the client
///
/// Never fails: a missing or unreadable session resolves to anonymous.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_viewer_identity(&self) -> Option<ViewerIdentity>;
}

/// Asks the user to confirm a destructive action
#[async_trait]
pub trait ConfirmAction: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Read-only movie and actor lookups
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn casting(&self, movie_id: &MovieId) -> Result<Vec<Actor>, SourceError>;

    async fn actor(&self, actor_id: &str) -> Result<ActorProfile, SourceError>;

    async fn movies_by_actor(&self, actor_id: &str) -> Result<Vec<MoviePoster>, SourceError>;

    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MoviePoster>, SourceError>;
}
