pub mod error;
pub mod http;
pub mod identity;
pub mod traits;

pub use error::SourceError;
pub use http::HttpBackend;
pub use identity::{FixedIdentity, SessionIdentityProvider};
pub use traits::{Catalog, ConfirmAction, CreatedReview, FetchedReviews, IdentityProvider, ReviewStore};
