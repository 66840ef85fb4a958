use super::load_backend;
use crate::output::{excerpt, Output};
use cinereview_config::PathManager;
use cinereview_models::{MovieId, MoviePoster};
use cinereview_sources::Catalog;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(comfy_table::Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn poster_table(movies: &[MoviePoster]) -> Table {
    let mut table = styled_table(&["ID", "Title", "Year"]);
    for movie in movies {
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title),
            Cell::new(movie.year().map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
        ]);
    }
    table
}

pub async fn show_casting(movie_id: String, paths: &PathManager, output: &Output) -> Result<()> {
    let (_, backend) = load_backend(paths)?;
    let movie_id = MovieId::new(movie_id);
    let cast = backend
        .casting(&movie_id)
        .await
        .map_err(|e| eyre!("Failed to load casting for movie {}: {}", movie_id, e))?;

    if !output.is_human() {
        output.json(&json!({ "movie_id": movie_id, "casting": cast }));
        return Ok(());
    }

    if cast.is_empty() {
        output.info(format!("No casting listed for movie {}.", movie_id));
        return Ok(());
    }

    output.human(format!("\n{} {}", "Casting".bright_cyan().bold(), format!("(movie {})", movie_id).dimmed()));
    let mut table = styled_table(&["ID", "Name", "Character"]);
    for actor in &cast {
        table.add_row(vec![Cell::new(actor.id), Cell::new(&actor.name), Cell::new(&actor.character)]);
    }
    output.human(table);
    Ok(())
}

pub async fn show_actor(actor_id: String, paths: &PathManager, output: &Output) -> Result<()> {
    let (_, backend) = load_backend(paths)?;

    // Profile and filmography are independent lookups
    let (profile, movies) = tokio::join!(backend.actor(&actor_id), backend.movies_by_actor(&actor_id));
    let profile = profile.map_err(|e| eyre!("Failed to load actor {}: {}", actor_id, e))?;
    let movies = movies.unwrap_or_else(|e| {
        tracing::warn!(actor_id = %actor_id, error = %e, "Failed to load filmography");
        Vec::new()
    });

    if !output.is_human() {
        output.json(&json!({ "actor": profile, "movies": movies }));
        return Ok(());
    }

    output.human(format!("\n{}", profile.name.bright_cyan().bold()));
    let mut details = styled_table(&["Field", "Value"]);
    if let Some(department) = &profile.known_for_department {
        details.add_row(vec![Cell::new("Known for"), Cell::new(department)]);
    }
    if let Some(birthday) = &profile.birthday {
        details.add_row(vec![Cell::new("Born"), Cell::new(birthday)]);
    }
    if let Some(place) = &profile.place_of_birth {
        details.add_row(vec![Cell::new("Place of birth"), Cell::new(place)]);
    }
    if !profile.biography.is_empty() {
        details.add_row(vec![Cell::new("Biography"), Cell::new(excerpt(&profile.biography, 300))]);
    }
    output.human(details);

    if movies.is_empty() {
        output.info("No movies listed.");
    } else {
        output.human(format!("\n{}", "Movies".bright_cyan().bold()));
        output.human(poster_table(&movies));
    }
    Ok(())
}

pub async fn search_movies(query: String, page: u32, paths: &PathManager, output: &Output) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(eyre!("Search query must not be empty"));
    }
    let page = page.max(1);

    let (_, backend) = load_backend(paths)?;
    let movies = backend
        .search_movies(query, page)
        .await
        .map_err(|e| eyre!("Search for '{}' failed: {}", query, e))?;

    if !output.is_human() {
        output.json(&json!({ "query": query, "page": page, "results": movies }));
        return Ok(());
    }

    if movies.is_empty() {
        output.info(format!("No movies found for '{}'.", query));
        return Ok(());
    }

    output.human(format!(
        "\n{} {}",
        format!("Results for '{}'", query).bright_cyan().bold(),
        format!("(page {})", page).dimmed()
    ));
    output.human(poster_table(&movies));
    output.info(format!("Next page: cinereview search \"{}\" --page {}", query, page + 1));
    Ok(())
}
