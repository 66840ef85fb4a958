use cinereview_config::DeleteCategoryPolicy;
use cinereview_models::{MovieId, ReviewId, ViewerIdentity};
use cinereview_sources::{ConfirmAction, IdentityProvider, ReviewStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::aggregate::ReviewAggregate;
use crate::coordinator::{DeleteOutcome, MutationCoordinator, SubmitOutcome};
use crate::error::ViewError;

/// Collaborators a movie view talks to
#[derive(Clone)]
pub struct ReviewServices {
    pub store: Arc<dyn ReviewStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub confirm: Arc<dyn ConfirmAction>,
    pub delete_policy: DeleteCategoryPolicy,
}

impl ReviewServices {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        identity: Arc<dyn IdentityProvider>,
        confirm: Arc<dyn ConfirmAction>,
    ) -> Self {
        Self {
            store,
            identity,
            confirm,
            delete_policy: DeleteCategoryPolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeleteCategoryPolicy) -> Self {
        self.delete_policy = policy;
        self
    }
}

/// Shared flag telling in-flight work whether its view is still displayed
#[derive(Debug, Clone, Default)]
pub struct ViewLiveness {
    closed: Arc<AtomicBool>,
}

impl ViewLiveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }
}

/// Reviews of one movie for as long as its detail view is open
pub struct MovieReviewView {
    aggregate: ReviewAggregate,
    viewer: Option<ViewerIdentity>,
    coordinator: MutationCoordinator,
    liveness: ViewLiveness,
}

impl MovieReviewView {
    pub async fn open(movie_id: MovieId, services: &ReviewServices) -> Result<Self, ViewError> {
        Self::open_guarded(movie_id, services, ViewLiveness::new())
            .await?
            .ok_or(ViewError::Closed)
    }

    /// Fetch reviews and identity together and build once both have resolved
    ///
    /// Returns `Ok(None)` when `liveness` was closed while the fetches were in
    /// flight; their results are dropped without building anything.
    pub async fn open_guarded(
        movie_id: MovieId,
        services: &ReviewServices,
        liveness: ViewLiveness,
    ) -> Result<Option<Self>, ViewError> {
        let (fetched, viewer) = tokio::join!(
            services.store.fetch_reviews(&movie_id),
            services.identity.resolve_viewer_identity(),
        );

        if !liveness.is_live() {
            debug!(movie_id = %movie_id, "View closed before reviews arrived, discarding results");
            return Ok(None);
        }

        let fetched = fetched?;
        info!(
            movie_id = %movie_id,
            reviews = fetched.len(),
            viewer = viewer.as_ref().map(|v| v.id.as_str()).unwrap_or("anonymous"),
            "Opened movie reviews"
        );
        let aggregate = ReviewAggregate::build(movie_id, fetched.into_flat(), viewer.as_ref());
        let coordinator = MutationCoordinator::new(services.store.clone(), services.confirm.clone())
            .with_delete_policy(services.delete_policy);

        Ok(Some(Self {
            aggregate,
            viewer,
            coordinator,
            liveness,
        }))
    }

    pub fn movie_id(&self) -> &MovieId {
        self.aggregate.movie_id()
    }

    pub fn aggregate(&self) -> &ReviewAggregate {
        &self.aggregate
    }

    pub fn viewer(&self) -> Option<&ViewerIdentity> {
        self.viewer.as_ref()
    }

    pub fn coordinator(&self) -> &MutationCoordinator {
        &self.coordinator
    }

    pub fn liveness(&self) -> ViewLiveness {
        self.liveness.clone()
    }

    pub fn is_open(&self) -> bool {
        self.liveness.is_live()
    }

    pub fn close(&self) {
        self.liveness.close();
    }

    pub async fn submit(&mut self, score: i32, text: &str) -> Result<SubmitOutcome, ViewError> {
        if !self.is_open() {
            return Err(ViewError::Closed);
        }
        let outcome = self
            .coordinator
            .submit_review(&mut self.aggregate, self.viewer.as_ref(), score, text)
            .await?;
        Ok(outcome)
    }

    pub async fn delete(&mut self, review_id: &ReviewId) -> Result<DeleteOutcome, ViewError> {
        if !self.is_open() {
            return Err(ViewError::Closed);
        }
        let outcome = self
            .coordinator
            .delete_review(&mut self.aggregate, review_id, self.viewer.as_ref())
            .await?;
        Ok(outcome)
    }

    /// Hand the aggregate over, ending the view
    pub fn into_aggregate(self) -> ReviewAggregate {
        self.liveness.close();
        self.aggregate
    }
}
