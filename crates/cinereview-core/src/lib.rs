pub mod aggregate;
pub mod coordinator;
pub mod error;
pub mod partition;
pub mod rank;
pub mod view;

#[cfg(test)]
mod test_support;

pub use aggregate::ReviewAggregate;
pub use coordinator::{AutoConfirm, DeleteOutcome, DeletionState, MutationCoordinator, SubmissionState, SubmitOutcome};
pub use error::{AggregateError, MutationError, ReviewField, ValidationError, ViewError};
pub use partition::partition;
pub use rank::rank;
pub use view::{MovieReviewView, ReviewServices, ViewLiveness};
