pub mod catalog;
pub mod config;
pub mod prompts;
pub mod reviews;

use cinereview_config::{Config, PathManager, SessionStore};
use cinereview_sources::HttpBackend;
use color_eyre::Result;
use std::path::Path;

/// Id token of the stored session
///
/// An unreadable credentials file means anonymous browsing, not a failed command.
fn stored_id_token(credentials_file: &Path) -> Option<String> {
    let mut session_store = SessionStore::new(credentials_file.to_path_buf());
    match session_store.load() {
        Ok(()) => session_store.id_token().cloned(),
        Err(e) => {
            tracing::warn!(
                "Failed to load credentials from {}: {}. Continuing without a session.",
                credentials_file.display(),
                e
            );
            None
        }
    }
}

/// Load config and the session token, and build the HTTP backend from them
pub fn load_backend(paths: &PathManager) -> Result<(Config, HttpBackend)> {
    let config = Config::load_or_default(paths)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", paths.config_file().display(), e))?;

    let backend = HttpBackend::new(&config).with_id_token(stored_id_token(&paths.credentials_file()));
    tracing::debug!(backend = backend.base_url(), authenticated = backend.is_authenticated(), "Backend ready");
    Ok((config, backend))
}
