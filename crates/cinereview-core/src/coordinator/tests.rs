use super::*;
use crate::test_support::{review, FakeStore, ScriptedConfirm};
use cinereview_models::MovieId;
use cinereview_sources::SourceError;

fn aggregate() -> ReviewAggregate {
    ReviewAggregate::build(
        MovieId::new("42"),
        vec![
            review("c1", "critic-a", 4, true),
            review("s1", "u2", 3, false),
            review("s2", "u1", 2, false),
        ],
        None,
    )
}

fn coordinator(store: &Arc<FakeStore>, confirm: &Arc<ScriptedConfirm>) -> MutationCoordinator {
    MutationCoordinator::new(store.clone(), confirm.clone())
}

fn spectator(id: &str) -> ViewerIdentity {
    ViewerIdentity::new(id, false).with_profile("Ada", "ada.png")
}

fn critic(id: &str) -> ViewerIdentity {
    ViewerIdentity::new(id, true)
}

#[tokio::test]
async fn test_spectator_submission_lands_at_front_of_spectators() {
    let store = Arc::new(FakeStore::with_ids(&["r9"]));
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = ReviewAggregate::empty(MovieId::new("42"));
    let viewer = spectator("u1");

    let outcome = coordinator
        .submit_review(&mut aggregate, Some(&viewer), 5, "Great film")
        .await
        .unwrap();

    assert_eq!(outcome.review_id, ReviewId::new("r9"));
    assert_eq!(outcome.category, Category::Spectators);
    assert_eq!(outcome.message, "Review published");
    assert_eq!(coordinator.submission_state(), SubmissionState::Committed);

    let (first_id, first) = aggregate.spectators().first().unwrap();
    assert_eq!(first_id.as_str(), "r9");
    assert_eq!(first.reviewer_id, "u1");
    assert_eq!(first.reviewer_name, "Ada");
    assert_eq!(first.reviewer_avatar, "ada.png");
    assert_eq!(first.movie_id.as_str(), "42");
    assert!(!first.is_trusted);
    assert!(aggregate.critics().is_empty());
    assert_eq!(aggregate.average_score(Category::Spectators), 5.0);

    let created = store.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].text, "Great film");
    assert!(!created[0].is_trusted);
}

#[tokio::test]
async fn test_submission_recomputes_average_with_existing_reviews() {
    let store = Arc::new(FakeStore::with_ids(&["r9"]));
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();
    let critics_before = aggregate.critics().clone();

    coordinator
        .submit_review(&mut aggregate, Some(&spectator("u5")), 5, "Great film")
        .await
        .unwrap();

    let ids: Vec<&str> = aggregate.spectators().keys().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["r9", "s1", "s2"]);
    assert_eq!(aggregate.critics(), &critics_before);
    // (5 + 3 + 2) / 3
    assert_eq!(aggregate.average_score(Category::Spectators), 3.3);
}

#[tokio::test]
async fn test_trusted_submission_lands_in_critics() {
    let store = Arc::new(FakeStore::with_ids(&["r10"]));
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();

    let outcome = coordinator
        .submit_review(&mut aggregate, Some(&critic("critic-z")), 1, "Overlong")
        .await
        .unwrap();

    assert_eq!(outcome.category, Category::Critics);
    assert_eq!(aggregate.critics().first().map(|(id, _)| id.as_str()), Some("r10"));
    assert_eq!(aggregate.spectators().len(), 2);
}

#[tokio::test]
async fn test_anonymous_submission_is_rejected_locally() {
    let store = Arc::new(FakeStore::default());
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();
    let before = aggregate.clone();

    let err = coordinator
        .submit_review(&mut aggregate, None, 5, "Great film")
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Unauthenticated));
    assert!(err.is_local());
    assert_eq!(store.create_calls(), 0);
    assert_eq!(aggregate, before);
    assert_eq!(coordinator.submission_state(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_invalid_submissions_never_reach_the_store() {
    let store = Arc::new(FakeStore::default());
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();
    let before = aggregate.clone();
    let viewer = spectator("u1");

    for (score, text, field) in [
        (0, "Great film", ReviewField::Score),
        (6, "Great film", ReviewField::Score),
        (-3, "Great film", ReviewField::Score),
        (3, "", ReviewField::Text),
        (3, "   \n", ReviewField::Text),
        (9, "", ReviewField::Score),
    ] {
        let err = coordinator
            .submit_review(&mut aggregate, Some(&viewer), score, text)
            .await
            .unwrap_err();
        match err {
            MutationError::Validation(validation) => assert_eq!(validation.field, field),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    assert_eq!(store.create_calls(), 0);
    assert_eq!(aggregate, before);
}

#[tokio::test]
async fn test_boundary_scores_are_accepted() {
    let store = Arc::new(FakeStore::with_ids(&["a", "b"]));
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = ReviewAggregate::empty(MovieId::new("42"));

    coordinator.submit_review(&mut aggregate, Some(&spectator("u1")), 1, "Bad").await.unwrap();
    coordinator.submit_review(&mut aggregate, Some(&spectator("u2")), 5, "Good").await.unwrap();
    assert_eq!(aggregate.average_score(Category::Spectators), 3.0);
}

#[tokio::test]
async fn test_remote_create_failure_leaves_aggregate_unchanged() {
    let store = Arc::new(FakeStore {
        fail_create: true,
        ..FakeStore::default()
    });
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();
    let before = aggregate.clone();

    let err = coordinator
        .submit_review(&mut aggregate, Some(&spectator("u1")), 4, "Fine")
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Transport(SourceError::Status { status: 503, .. })));
    assert!(!err.is_local());
    assert_eq!(store.create_calls(), 1);
    assert_eq!(aggregate, before);
    assert_eq!(coordinator.submission_state(), SubmissionState::Failed);
}

#[tokio::test]
async fn test_store_reusing_an_id_is_reported_as_duplicate() {
    let store = Arc::new(FakeStore::with_ids(&["s1"]));
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();
    let before = aggregate.clone();

    let err = coordinator
        .submit_review(&mut aggregate, Some(&critic("critic-z")), 4, "Fine")
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Aggregate(AggregateError::DuplicateId(_))));
    assert_eq!(aggregate, before);
    assert_eq!(coordinator.submission_state(), SubmissionState::Failed);
}

#[tokio::test]
async fn test_confirmed_delete_removes_from_viewer_category() {
    let store = Arc::new(FakeStore::default());
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();

    let outcome = coordinator
        .delete_review(&mut aggregate, &ReviewId::new("s2"), Some(&spectator("u1")))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome::Deleted {
            category: Category::Spectators,
            message: "Review deleted".to_string(),
        }
    );
    assert!(!aggregate.contains(&ReviewId::new("s2")));
    assert_eq!(confirm.times_asked(), 1);
    assert_eq!(
        store.deleted.lock().unwrap().as_slice(),
        &[(ReviewId::new("s2"), MovieId::new("42"))]
    );
    assert_eq!(coordinator.deletion_state(), DeletionState::Committed);
}

#[tokio::test]
async fn test_declined_delete_makes_no_remote_call() {
    let store = Arc::new(FakeStore::default());
    let confirm = Arc::new(ScriptedConfirm::answering(false));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();
    let before = aggregate.clone();

    let outcome = coordinator
        .delete_review(&mut aggregate, &ReviewId::new("s2"), Some(&spectator("u1")))
        .await
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(confirm.times_asked(), 1);
    assert_eq!(store.delete_calls(), 0);
    assert_eq!(aggregate, before);
    assert_eq!(coordinator.deletion_state(), DeletionState::Idle);
}

#[tokio::test]
async fn test_remote_delete_failure_leaves_aggregate_unchanged() {
    let store = Arc::new(FakeStore {
        fail_delete: true,
        ..FakeStore::default()
    });
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();
    let before = aggregate.clone();

    let err = coordinator
        .delete_review(&mut aggregate, &ReviewId::new("s2"), Some(&spectator("u1")))
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Transport(_)));
    assert_eq!(store.delete_calls(), 1);
    assert_eq!(aggregate, before);
    assert_eq!(coordinator.deletion_state(), DeletionState::Failed);
}

#[tokio::test]
async fn test_delete_with_category_mismatch_is_not_found() {
    // c1 lives in critics, but a spectator viewer targets the spectator category
    let store = Arc::new(FakeStore::default());
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();

    let err = coordinator
        .delete_review(&mut aggregate, &ReviewId::new("c1"), Some(&spectator("critic-a")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MutationError::Aggregate(AggregateError::NotFound { category: Category::Spectators, .. })
    ));
    assert!(aggregate.critics().contains_key(&ReviewId::new("c1")));
    assert_eq!(confirm.times_asked(), 0);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn test_stored_review_policy_uses_recorded_category() {
    // critic-a wrote c1 while trusted and has since lost that status
    let store = Arc::new(FakeStore::default());
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm).with_delete_policy(DeleteCategoryPolicy::StoredReview);
    let mut aggregate = aggregate();

    let outcome = coordinator
        .delete_review(&mut aggregate, &ReviewId::new("c1"), Some(&spectator("critic-a")))
        .await
        .unwrap();

    assert!(matches!(outcome, DeleteOutcome::Deleted { category: Category::Critics, .. }));
    assert!(aggregate.critics().is_empty());
}

#[tokio::test]
async fn test_anonymous_delete_is_rejected_locally() {
    let store = Arc::new(FakeStore::default());
    let confirm = Arc::new(ScriptedConfirm::answering(true));
    let mut coordinator = coordinator(&store, &confirm);
    let mut aggregate = aggregate();

    let err = coordinator
        .delete_review(&mut aggregate, &ReviewId::new("s2"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, MutationError::Unauthenticated));
    assert_eq!(confirm.times_asked(), 0);
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn test_submit_then_delete_round_trip() {
    let store = Arc::new(FakeStore::with_ids(&["r9"]));
    let mut coordinator = MutationCoordinator::new(store.clone(), Arc::new(AutoConfirm));
    let mut aggregate = aggregate();
    let before = aggregate.clone();
    let viewer = spectator("u7");

    let outcome = coordinator
        .submit_review(&mut aggregate, Some(&viewer), 4, "Worth it")
        .await
        .unwrap();
    coordinator
        .delete_review(&mut aggregate, &outcome.review_id, Some(&viewer))
        .await
        .unwrap();

    assert_eq!(aggregate, before);
}

#[test]
fn test_validate_submission() {
    assert_eq!(validate_submission(3, "ok"), Ok(3));
    assert_eq!(validate_submission(0, "ok").unwrap_err().field, ReviewField::Score);
    assert_eq!(validate_submission(3, " ").unwrap_err().field, ReviewField::Text);
}
