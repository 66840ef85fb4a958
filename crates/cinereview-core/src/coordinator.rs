use async_trait::async_trait;
use cinereview_config::DeleteCategoryPolicy;
use cinereview_models::{Category, NewReview, ReviewId, ViewerIdentity};
use cinereview_sources::{ConfirmAction, ReviewStore};
use std::sync::Arc;
use tracing::{info, warn};

use crate::aggregate::ReviewAggregate;
use crate::error::{AggregateError, MutationError, ReviewField, ValidationError};

#[cfg(test)]
mod tests;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

const DELETE_PROMPT: &str = "Delete this review? This cannot be undone.";

/// Progress of the most recent submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Committed,
    Failed,
}

/// Progress of the most recent deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionState {
    #[default]
    Idle,
    ConfirmPending,
    Deleting,
    Committed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub review_id: ReviewId,
    pub category: Category,
    pub message: String, // Store confirmation, shown to the user
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { category: Category, message: String },
    Declined,
}

/// Confirmation that always agrees (used when prompts are disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl ConfirmAction for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Check score and text before anything is sent to the store
pub fn validate_submission(score: i32, text: &str) -> Result<u8, ValidationError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ValidationError::new(
            ReviewField::Score,
            format!("score must be between {} and {}, got {}", MIN_SCORE, MAX_SCORE, score),
        ));
    }
    if text.trim().is_empty() {
        return Err(ValidationError::new(ReviewField::Text, "review text cannot be empty"));
    }
    // In range 1..=5, so the cast cannot truncate
    Ok(score as u8)
}

/// Applies review mutations remotely first, then to the aggregate
///
/// The aggregate is only touched after the store has confirmed the change,
/// so a failed call leaves it exactly as it was.
pub struct MutationCoordinator {
    store: Arc<dyn ReviewStore>,
    confirm: Arc<dyn ConfirmAction>,
    delete_policy: DeleteCategoryPolicy,
    submission: SubmissionState,
    deletion: DeletionState,
}

impl MutationCoordinator {
    pub fn new(store: Arc<dyn ReviewStore>, confirm: Arc<dyn ConfirmAction>) -> Self {
        Self {
            store,
            confirm,
            delete_policy: DeleteCategoryPolicy::default(),
            submission: SubmissionState::Idle,
            deletion: DeletionState::Idle,
        }
    }

    pub fn with_delete_policy(mut self, policy: DeleteCategoryPolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    pub fn deletion_state(&self) -> DeletionState {
        self.deletion
    }

    pub async fn submit_review(
        &mut self,
        aggregate: &mut ReviewAggregate,
        viewer: Option<&ViewerIdentity>,
        score: i32,
        text: &str,
    ) -> Result<SubmitOutcome, MutationError> {
        self.submission = SubmissionState::Idle;
        let viewer = viewer.ok_or(MutationError::Unauthenticated)?;
        let score = validate_submission(score, text)?;

        let new_review = NewReview {
            movie_id: aggregate.movie_id().clone(),
            reviewer_id: viewer.id.clone(),
            reviewer_name: viewer.display_name.clone(),
            reviewer_avatar: viewer.avatar_url.clone(),
            score,
            text: text.to_string(),
            is_trusted: viewer.is_trusted,
        };

        self.submission = SubmissionState::Submitting;
        let created = match self.store.create_review(&new_review).await {
            Ok(created) => created,
            Err(e) => {
                warn!(movie_id = %new_review.movie_id, "Review submission failed: {}", e);
                self.submission = SubmissionState::Failed;
                return Err(e.into());
            }
        };

        let review = new_review.into_review(created.id.clone());
        let category = review.category();
        if let Err(e) = aggregate.insert(review) {
            self.submission = SubmissionState::Failed;
            return Err(e.into());
        }

        self.submission = SubmissionState::Committed;
        info!(movie_id = %aggregate.movie_id(), review_id = %created.id, %category, "Review published");
        Ok(SubmitOutcome {
            review_id: created.id,
            category,
            message: created.message,
        })
    }

    pub async fn delete_review(
        &mut self,
        aggregate: &mut ReviewAggregate,
        review_id: &ReviewId,
        viewer: Option<&ViewerIdentity>,
    ) -> Result<DeleteOutcome, MutationError> {
        self.deletion = DeletionState::Idle;
        let viewer = viewer.ok_or(MutationError::Unauthenticated)?;
        let category = self.delete_category(aggregate, review_id, viewer)?;

        // Nothing is asked or sent for a review this view does not hold there
        if !aggregate.reviews(category).contains_key(review_id) {
            return Err(AggregateError::NotFound {
                id: review_id.clone(),
                category,
            }
            .into());
        }

        self.deletion = DeletionState::ConfirmPending;
        if !self.confirm.confirm(DELETE_PROMPT).await {
            self.deletion = DeletionState::Idle;
            info!(review_id = %review_id, "Review deletion declined");
            return Ok(DeleteOutcome::Declined);
        }

        self.deletion = DeletionState::Deleting;
        let message = match self.store.delete_review(review_id, aggregate.movie_id()).await {
            Ok(message) => message,
            Err(e) => {
                warn!(movie_id = %aggregate.movie_id(), review_id = %review_id, "Review deletion failed: {}", e);
                self.deletion = DeletionState::Failed;
                return Err(e.into());
            }
        };

        if let Err(e) = aggregate.remove(review_id, category) {
            self.deletion = DeletionState::Failed;
            return Err(e.into());
        }

        self.deletion = DeletionState::Committed;
        info!(movie_id = %aggregate.movie_id(), review_id = %review_id, %category, "Review deleted");
        Ok(DeleteOutcome::Deleted { category, message })
    }

    fn delete_category(
        &self,
        aggregate: &ReviewAggregate,
        review_id: &ReviewId,
        viewer: &ViewerIdentity,
    ) -> Result<Category, AggregateError> {
        let viewer_category = Category::for_trust(viewer.is_trusted);
        match self.delete_policy {
            DeleteCategoryPolicy::ActingViewer => Ok(viewer_category),
            DeleteCategoryPolicy::StoredReview => {
                aggregate
                    .category_of(review_id)
                    .ok_or_else(|| AggregateError::NotFound {
                        id: review_id.clone(),
                        category: viewer_category,
                    })
            }
        }
    }
}
