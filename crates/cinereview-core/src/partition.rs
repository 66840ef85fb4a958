use cinereview_models::Review;

/// Split reviews into `(critics, spectators)` by the reviewer trust snapshot
///
/// Stable: each output keeps the relative order of the input.
pub fn partition<I>(reviews: I) -> (Vec<Review>, Vec<Review>)
where
    I: IntoIterator<Item = Review>,
{
    reviews.into_iter().partition(|review| review.is_trusted)
}
