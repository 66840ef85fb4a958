use async_trait::async_trait;
use cinereview_models::{MovieId, NewReview, Review, ReviewId, ViewerIdentity};
use cinereview_sources::{ConfirmAction, CreatedReview, FetchedReviews, IdentityProvider, ReviewStore, SourceError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn review(id: &str, reviewer_id: &str, score: u8, is_trusted: bool) -> Review {
    Review {
        id: ReviewId::new(id),
        movie_id: MovieId::new("42"),
        reviewer_id: reviewer_id.to_string(),
        reviewer_name: String::new(),
        reviewer_avatar: String::new(),
        score,
        text: format!("review {}", id),
        is_trusted,
    }
}

pub fn server_error() -> SourceError {
    SourceError::Status {
        operation: "test",
        status: 503,
        message: "backend unavailable".to_string(),
    }
}

/// In-memory review store that records every remote call
#[derive(Default)]
pub struct FakeStore {
    pub fetched: Mutex<Option<FetchedReviews>>,
    pub fetch_delay: Option<Duration>,
    pub fail_fetch: bool,
    pub fail_create: bool,
    pub fail_delete: bool,
    pub next_ids: Mutex<VecDeque<String>>,
    pub created: Mutex<Vec<NewReview>>,
    pub deleted: Mutex<Vec<(ReviewId, MovieId)>>,
    pub fetch_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_ids(ids: &[&str]) -> Self {
        Self {
            next_ids: Mutex::new(ids.iter().map(|id| id.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_reviews(reviews: FetchedReviews) -> Self {
        Self {
            fetched: Mutex::new(Some(reviews)),
            ..Self::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn delete_calls(&self) -> usize {
        self.deleted.lock().unwrap().len()
    }
}

#[async_trait]
impl ReviewStore for FakeStore {
    async fn fetch_reviews(&self, _movie_id: &MovieId) -> Result<FetchedReviews, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch {
            return Err(server_error());
        }
        Ok(self.fetched.lock().unwrap().clone().unwrap_or_default())
    }

    async fn create_review(&self, review: &NewReview) -> Result<CreatedReview, SourceError> {
        self.created.lock().unwrap().push(review.clone());
        if self.fail_create {
            return Err(server_error());
        }
        let id = self
            .next_ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("r{}", self.create_calls()));
        Ok(CreatedReview {
            id: ReviewId::new(id),
            message: "Review published".to_string(),
        })
    }

    async fn delete_review(&self, id: &ReviewId, movie_id: &MovieId) -> Result<String, SourceError> {
        self.deleted.lock().unwrap().push((id.clone(), movie_id.clone()));
        if self.fail_delete {
            return Err(server_error());
        }
        Ok("Review deleted".to_string())
    }
}

/// Confirmation dialog with a scripted answer
pub struct ScriptedConfirm {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmAction for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

/// Identity provider that resolves after an optional delay
pub struct DelayedIdentity {
    pub viewer: Option<ViewerIdentity>,
    pub delay: Duration,
}

#[async_trait]
impl IdentityProvider for DelayedIdentity {
    async fn resolve_viewer_identity(&self) -> Option<ViewerIdentity> {
        tokio::time::sleep(self.delay).await;
        self.viewer.clone()
    }
}
