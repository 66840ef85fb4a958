use cinereview_models::Review;
use std::cmp::Ordering;

/// Order reviews so the viewer's own review comes first
///
/// Uses a stable sort where only "is by the viewer" is compared, so every
/// other pair keeps its input order. Without a viewer the input is returned
/// untouched.
pub fn rank(mut reviews: Vec<Review>, viewer_id: Option<&str>) -> Vec<Review> {
    let Some(viewer_id) = viewer_id else {
        return reviews;
    };

    reviews.sort_by(|a, b| match (a.is_by(viewer_id), b.is_by(viewer_id)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    });
    reviews
}
