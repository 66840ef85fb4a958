pub mod actor;
pub mod category;
pub mod movie;
pub mod review;
pub mod viewer;

pub use actor::{Actor, ActorProfile};
pub use category::Category;
pub use movie::{MovieId, MoviePoster};
pub use review::{NewReview, Review, ReviewId};
pub use viewer::ViewerIdentity;
