use super::{load_backend, prompts};
use crate::output::{excerpt, stars, Output};
use cinereview_config::PathManager;
use cinereview_core::{AutoConfirm, DeleteOutcome, MovieReviewView, MutationError, ReviewAggregate, ReviewServices, ViewError};
use cinereview_models::{Category, MovieId, ReviewId};
use cinereview_sources::{ConfirmAction, SessionIdentityProvider};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;

pub async fn run_reviews(cmd: crate::ReviewCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        crate::ReviewCommands::Show { movie_id } => show_reviews(movie_id, paths, output).await,
        crate::ReviewCommands::Post { movie_id, score, text } => post_review(movie_id, score, text, paths, output).await,
        crate::ReviewCommands::Delete { movie_id, review_id, yes } => delete_review(movie_id, review_id, yes, paths, output).await,
    }
}

async fn open_view(
    movie_id: String,
    paths: &PathManager,
    confirm_with_prompt: bool,
) -> Result<MovieReviewView> {
    let (config, backend) = load_backend(paths)?;
    let confirm: Arc<dyn ConfirmAction> = if confirm_with_prompt && config.reviews.confirm_deletes {
        Arc::new(prompts::DialogConfirm)
    } else {
        Arc::new(AutoConfirm)
    };

    let services = ReviewServices::new(
        Arc::new(backend),
        Arc::new(SessionIdentityProvider::new(paths.credentials_file())),
        confirm,
    )
    .with_delete_policy(config.reviews.delete_category);

    MovieReviewView::open(MovieId::new(movie_id.clone()), &services)
        .await
        .map_err(|e| eyre!("Failed to load reviews for movie {}: {}", movie_id, e))
}

async fn show_reviews(movie_id: String, paths: &PathManager, output: &Output) -> Result<()> {
    let view = open_view(movie_id, paths, false).await?;
    let aggregate = view.aggregate();
    let viewer_id = view.viewer().map(|v| v.id.as_str());

    if !output.is_human() {
        output.json(&json!({
            "movie_id": aggregate.movie_id(),
            "viewer": view.viewer(),
            "critics": category_json(aggregate, Category::Critics),
            "spectators": category_json(aggregate, Category::Spectators),
        }));
        return Ok(());
    }

    for category in Category::ALL {
        output.human(format!(
            "\n{} {} {}",
            category_title(category).bright_cyan().bold(),
            format!("{:.1} avg", aggregate.average_score(category)).yellow(),
            format!("({} reviews)", aggregate.reviews(category).len()).dimmed(),
        ));
        if aggregate.reviews(category).is_empty() {
            output.human("  No reviews yet.".dimmed());
            continue;
        }
        output.human(review_table(aggregate, category, viewer_id));
    }

    if viewer_id.is_none() {
        output.info("\nBrowsing anonymously. Sign in with 'cinereview config session' to post a review.");
    }
    Ok(())
}

fn category_title(category: Category) -> &'static str {
    match category {
        Category::Critics => "Critics",
        Category::Spectators => "Spectators",
    }
}

fn category_json(aggregate: &ReviewAggregate, category: Category) -> serde_json::Value {
    json!({
        "average_score": aggregate.average_score(category),
        "reviews": aggregate.reviews(category).values().collect::<Vec<_>>(),
    })
}

fn review_table(aggregate: &ReviewAggregate, category: Category, viewer_id: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Reviewer").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Score").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Review").add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    for review in aggregate.reviews(category).values() {
        let mut reviewer = if review.reviewer_name.is_empty() {
            review.reviewer_id.clone()
        } else {
            review.reviewer_name.clone()
        };
        if viewer_id.is_some_and(|id| review.is_by(id)) {
            reviewer.push_str(" (you)");
        }
        table.add_row(vec![
            Cell::new(review.id.as_str()),
            Cell::new(reviewer),
            Cell::new(stars(review.score)).fg(comfy_table::Color::Yellow),
            Cell::new(excerpt(&review.text, 60)),
        ]);
    }
    table
}

async fn post_review(
    movie_id: String,
    score: Option<i32>,
    text: Option<String>,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let mut view = open_view(movie_id, paths, false).await?;

    if view.viewer().is_none() {
        output.warn("Who are you? You need to sign in before publishing a review.");
        output.info("Store your session with 'cinereview config session --uid <UID>' and try again.");
        return Err(eyre!("Not signed in"));
    }

    let score = match score {
        Some(score) => score,
        None => prompts::prompt_number("Score (1-5)", output)?,
    };
    let text = match text {
        Some(text) => text,
        None => prompts::prompt_string("Your review", None)?,
    };

    let outcome = view
        .submit(score, &text)
        .await
        .map_err(|e| eyre!("Review not published: {}", e))?;

    if output.is_human() {
        let message = if outcome.message.is_empty() {
            "Review published".to_string()
        } else {
            outcome.message.clone()
        };
        output.success(format!("{} (id {}, {})", message, outcome.review_id, outcome.category));
        output.info(format!(
            "{} average is now {:.1}",
            category_title(outcome.category),
            view.aggregate().average_score(outcome.category)
        ));
    } else {
        output.json(&json!({
            "success": true,
            "review_id": outcome.review_id,
            "category": outcome.category,
            "message": outcome.message,
            "average_score": view.aggregate().average_score(outcome.category),
        }));
    }
    Ok(())
}

/// The backend no longer has the review, e.g. it was deleted from another session
fn already_deleted(err: &ViewError) -> bool {
    matches!(err, ViewError::Mutation(MutationError::Transport(e)) if e.is_not_found())
}

async fn delete_review(
    movie_id: String,
    review_id: String,
    yes: bool,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let mut view = open_view(movie_id, paths, !yes).await?;

    let review_id = ReviewId::new(review_id);
    let outcome = match view.delete(&review_id).await {
        Ok(outcome) => outcome,
        Err(e) if already_deleted(&e) => {
            output.warn(format!("Review {} was already deleted", review_id));
            return Ok(());
        }
        Err(e) => return Err(eyre!("Review not deleted: {}", e)),
    };

    match outcome {
        DeleteOutcome::Declined => {
            output.info("Deletion cancelled.");
            if !output.is_human() {
                output.json(&json!({ "success": false, "review_id": review_id, "declined": true }));
            }
        }
        DeleteOutcome::Deleted { category, message } => {
            if output.is_human() {
                let message = if message.is_empty() { "Review deleted".to_string() } else { message };
                output.success(format!("{} ({})", message, review_id));
            } else {
                output.json(&json!({
                    "success": true,
                    "review_id": review_id,
                    "category": category,
                    "message": message,
                }));
            }
        }
    }
    Ok(())
}
