use cinereview_models::{Category, MovieId, Review, ReviewId, ViewerIdentity};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::AggregateError;
use crate::partition::partition;
use crate::rank::rank;


/// Partitioned, ranked reviews of one movie
///
/// Owned by the movie view for as long as it is displayed. Each review id
/// lives in exactly one category and the iteration order of each category is
/// its display order.
#[derive(Debug, Clone)]
pub struct ReviewAggregate {
    movie_id: MovieId,
    critics: IndexMap<ReviewId, Review>,
    spectators: IndexMap<ReviewId, Review>,
}

impl ReviewAggregate {
    pub fn empty(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            critics: IndexMap::new(),
            spectators: IndexMap::new(),
        }
    }

    /// Partition the fetched reviews, then rank each category for the viewer
    pub fn build<I>(movie_id: MovieId, reviews: I, viewer: Option<&ViewerIdentity>) -> Self
    where
        I: IntoIterator<Item = Review>,
    {
        let viewer_id = viewer.map(|v| v.id.as_str());
        let (critics, spectators) = partition(reviews);

        let mut aggregate = Self::empty(movie_id);
        for review in rank(critics, viewer_id).into_iter().chain(rank(spectators, viewer_id)) {
            if aggregate.contains(&review.id) {
                // First occurrence wins so an id never ends up in both categories
                warn!(movie_id = %aggregate.movie_id, review_id = %review.id, "Dropping duplicate review from fetch");
                continue;
            }
            let category = review.category();
            aggregate.category_mut(category).insert(review.id.clone(), review);
        }

        debug!(
            movie_id = %aggregate.movie_id,
            critics = aggregate.critics.len(),
            spectators = aggregate.spectators.len(),
            ranked_for = viewer_id.unwrap_or("anonymous"),
            "Built review aggregate"
        );
        aggregate
    }

    pub fn movie_id(&self) -> &MovieId {
        &self.movie_id
    }

    pub fn critics(&self) -> &IndexMap<ReviewId, Review> {
        &self.critics
    }

    pub fn spectators(&self) -> &IndexMap<ReviewId, Review> {
        &self.spectators
    }

    pub fn reviews(&self, category: Category) -> &IndexMap<ReviewId, Review> {
        match category {
            Category::Critics => &self.critics,
            Category::Spectators => &self.spectators,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut IndexMap<ReviewId, Review> {
        match category {
            Category::Critics => &mut self.critics,
            Category::Spectators => &mut self.spectators,
        }
    }

    pub fn get(&self, id: &ReviewId) -> Option<&Review> {
        self.critics.get(id).or_else(|| self.spectators.get(id))
    }

    /// Category currently holding `id`
    pub fn category_of(&self, id: &ReviewId) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| self.reviews(*category).contains_key(id))
    }

    pub fn contains(&self, id: &ReviewId) -> bool {
        self.category_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.critics.len() + self.spectators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.critics.is_empty() && self.spectators.is_empty()
    }

    /// The viewer's own review, if they have written one
    pub fn viewer_review(&self, viewer_id: &str) -> Option<&Review> {
        self.critics
            .values()
            .chain(self.spectators.values())
            .find(|review| review.is_by(viewer_id))
    }

    /// Mean score of a category rounded half-up to one decimal, 0 when empty
    pub fn average_score(&self, category: Category) -> f64 {
        let reviews = self.reviews(category);
        if reviews.is_empty() {
            return 0.0;
        }

        // Rounded in integer tenths: round(total * 10 / count)
        let count = reviews.len() as u64;
        let total: u64 = reviews.values().map(|review| u64::from(review.score)).sum();
        let tenths = (total * 20 + count) / (count * 2);
        tenths as f64 / 10.0
    }

    /// Add a freshly created review at the front of its category
    pub fn insert(&mut self, review: Review) -> Result<(), AggregateError> {
        if self.contains(&review.id) {
            return Err(AggregateError::DuplicateId(review.id));
        }

        let category = review.category();
        debug!(movie_id = %self.movie_id, review_id = %review.id, %category, "Inserting review");
        self.category_mut(category).shift_insert(0, review.id.clone(), review);
        Ok(())
    }

    /// Remove a review from the given category
    ///
    /// The entry is not looked up in the other category: a wrong category is
    /// reported as `NotFound`.
    pub fn remove(&mut self, id: &ReviewId, category: Category) -> Result<Review, AggregateError> {
        let removed = self
            .category_mut(category)
            .shift_remove(id)
            .ok_or_else(|| AggregateError::NotFound {
                id: id.clone(),
                category,
            })?;
        debug!(movie_id = %self.movie_id, review_id = %id, %category, "Removed review");
        Ok(removed)
    }
}

/// Equality includes display order, not just membership
impl PartialEq for ReviewAggregate {
    fn eq(&self, other: &Self) -> bool {
        self.movie_id == other.movie_id
            && self.critics.iter().eq(other.critics.iter())
            && self.spectators.iter().eq(other.spectators.iter())
    }
}

impl Eq for ReviewAggregate {}
