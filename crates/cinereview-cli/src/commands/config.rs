use super::prompts;
use crate::output::{Output, OutputFormat};
use cinereview_config::{Config, DeleteCategoryPolicy, PathManager, SessionStore, StoredSession};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_config(cmd: crate::ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show => show_config(paths, output).await,
        crate::ConfigCommands::Backend { url, timeout_secs, user_agent } => {
            configure_backend(url, timeout_secs, user_agent, paths, output).await
        }
        crate::ConfigCommands::Reviews { delete_category, confirm_deletes } => {
            configure_reviews(delete_category.map(Into::into), confirm_deletes, paths, output).await
        }
        crate::ConfigCommands::Session { uid, name, photo_url, verified, id_token } => {
            configure_session(uid, name, photo_url, verified, id_token, paths, output).await
        }
        crate::ConfigCommands::ClearSession => clear_session(paths, output).await,
    }
}

fn load_config(paths: &PathManager) -> Result<Config> {
    Config::load_or_default(paths)
        .map_err(|e| eyre!("Failed to load config from {}: {}", paths.config_file().display(), e))
}

fn save_config(config: &Config, paths: &PathManager) -> Result<()> {
    config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;
    let config_file = paths.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))
}

fn load_sessions(paths: &PathManager) -> Result<SessionStore> {
    let credentials_file = paths.credentials_file();
    let mut store = SessionStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(store)
}

fn policy_name(policy: DeleteCategoryPolicy) -> &'static str {
    match policy {
        DeleteCategoryPolicy::ActingViewer => "acting-viewer",
        DeleteCategoryPolicy::StoredReview => "stored-review",
    }
}

/// Tokens are never printed in full
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    if token.chars().count() <= 6 {
        "******".to_string()
    } else {
        format!("{}…", visible)
    }
}

async fn show_config(paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let config = load_config(paths)?;
    let session = load_sessions(paths)?.session();

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if !config_file.exists() {
                output.warn(format!("No configuration file at {}, showing defaults.", config_file.display()));
            }

            output.human(format!("\n{}", "Configuration".bright_cyan().bold()));
            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
            table.add_row(vec![Cell::new("Backend URL"), Cell::new(config.backend_url())]);
            table.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", config.backend.timeout_secs))]);
            table.add_row(vec![
                Cell::new("User agent"),
                Cell::new(config.backend.user_agent.as_deref().unwrap_or("(default)")),
            ]);
            table.add_row(vec![
                Cell::new("Delete category"),
                Cell::new(policy_name(config.reviews.delete_category)),
            ]);
            table.add_row(vec![
                Cell::new("Confirm deletes"),
                Cell::new(if config.reviews.confirm_deletes { "yes" } else { "no" }),
            ]);
            output.human(table);

            output.human(format!("\n{}", "Session".bright_cyan().bold()));
            match &session {
                Some(session) => {
                    let mut table = Table::new();
                    table.load_preset(comfy_table::presets::UTF8_FULL);
                    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                    table.add_row(vec![Cell::new("User"), Cell::new(&session.uid)]);
                    table.add_row(vec![
                        Cell::new("Name"),
                        Cell::new(session.display_name.as_deref().unwrap_or("-")),
                    ]);
                    table.add_row(vec![
                        Cell::new("Publishes as"),
                        Cell::new(if session.email_verified { "critic" } else { "spectator" }),
                    ]);
                    table.add_row(vec![
                        Cell::new("ID token"),
                        Cell::new(session.id_token.as_deref().map(mask_token).unwrap_or_else(|| "-".to_string())),
                    ]);
                    if let Some(signed_in_at) = session.signed_in_at {
                        table.add_row(vec![Cell::new("Signed in"), Cell::new(signed_in_at.to_rfc3339())]);
                    }
                    output.human(table);
                }
                None => output.info("Not signed in (anonymous browsing)."),
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "config_exists": config_file.exists(),
                "backend": {
                    "url": config.backend_url(),
                    "timeout_secs": config.backend.timeout_secs,
                    "user_agent": config.backend.user_agent,
                },
                "reviews": {
                    "delete_category": policy_name(config.reviews.delete_category),
                    "confirm_deletes": config.reviews.confirm_deletes,
                },
                "session": session.map(|s| json!({
                    "uid": s.uid,
                    "display_name": s.display_name,
                    "email_verified": s.email_verified,
                    "has_id_token": s.id_token.is_some(),
                    "signed_in_at": s.signed_in_at.map(|t| t.to_rfc3339()),
                })),
            }));
        }
    }
    Ok(())
}

async fn configure_backend(
    url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let mut config = load_config(paths)?;

    let url = match url {
        Some(url) => url,
        None if timeout_secs.is_none() && user_agent.is_none() => {
            prompts::prompt_string("Backend URL", Some(&config.backend.url))?
        }
        None => config.backend.url.clone(),
    };
    config.backend.url = url.trim().to_string();
    if let Some(timeout_secs) = timeout_secs {
        config.backend.timeout_secs = timeout_secs;
    }
    if let Some(user_agent) = user_agent {
        config.backend.user_agent = Some(user_agent).filter(|ua| !ua.trim().is_empty());
    }

    save_config(&config, paths)?;
    output.success(format!("Backend set to {}", config.backend_url()));
    Ok(())
}

async fn configure_reviews(
    delete_category: Option<DeleteCategoryPolicy>,
    confirm_deletes: Option<bool>,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    if delete_category.is_none() && confirm_deletes.is_none() {
        output.warn("Nothing to change. Pass --delete-category and/or --confirm-deletes.");
        return Ok(());
    }

    let mut config = load_config(paths)?;
    if let Some(policy) = delete_category {
        config.reviews.delete_category = policy;
    }
    if let Some(confirm) = confirm_deletes {
        config.reviews.confirm_deletes = confirm;
    }

    save_config(&config, paths)?;
    output.success(format!(
        "Review options saved (delete category: {}, confirm deletes: {})",
        policy_name(config.reviews.delete_category),
        config.reviews.confirm_deletes
    ));
    Ok(())
}

async fn configure_session(
    uid: Option<String>,
    name: Option<String>,
    photo_url: Option<String>,
    verified: bool,
    id_token: Option<String>,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let uid = match uid {
        Some(uid) => uid,
        None => prompts::prompt_string("User id", None)?,
    };
    let uid = uid.trim().to_string();
    if uid.is_empty() {
        return Err(eyre!("A user id is required to store a session"));
    }

    let mut store = load_sessions(paths)?;
    store.set_session(StoredSession {
        uid: uid.clone(),
        display_name: name.filter(|n| !n.trim().is_empty()),
        photo_url: photo_url.filter(|p| !p.trim().is_empty()),
        email_verified: verified,
        id_token: id_token.filter(|t| !t.trim().is_empty()),
        signed_in_at: None,
    });
    store
        .save()
        .map_err(|e| eyre!("Failed to save session to {}: {}", paths.credentials_file().display(), e))?;

    output.success(format!(
        "Signed in as {} ({})",
        uid,
        if verified { "critic" } else { "spectator" }
    ));
    Ok(())
}

async fn clear_session(paths: &PathManager, output: &Output) -> Result<()> {
    let mut store = load_sessions(paths)?;
    if store.session().is_none() {
        output.info("No session stored.");
        return Ok(());
    }
    store.clear_session();
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", paths.credentials_file().display(), e))?;
    output.success("Signed out");
    Ok(())
}
