use async_trait::async_trait;
use cinereview_config::Config;
use cinereview_models::{Actor, ActorProfile, MovieId, MoviePoster, NewReview, ReviewId};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::SourceError;
use crate::http::api;
use crate::traits::{Catalog, CreatedReview, FetchedReviews, ReviewStore};

const DEFAULT_USER_AGENT: &str = concat!("cinereview/", env!("CARGO_PKG_VERSION"));

/// Create a reqwest Client honouring the configured timeout and user agent
pub fn create_backend_client(config: &Config) -> Client {
    let user_agent = config
        .backend
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.backend.timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Review store and catalog backed by the REST backend
#[derive(Clone)]
pub struct HttpBackend {
    client: Arc<Client>,
    base_url: String,
    id_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Arc::new(create_backend_client(config)),
            base_url: config.backend_url().to_string(),
            id_token: None,
        }
    }

    /// Authenticate mutating calls with the session's id token
    pub fn with_id_token(mut self, id_token: Option<String>) -> Self {
        self.id_token = id_token.filter(|token| !token.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.id_token.is_some()
    }
}

#[async_trait]
impl ReviewStore for HttpBackend {
    async fn fetch_reviews(&self, movie_id: &MovieId) -> Result<FetchedReviews, SourceError> {
        api::get_reviews(&self.client, &self.base_url, movie_id).await
    }

    async fn create_review(&self, review: &NewReview) -> Result<CreatedReview, SourceError> {
        let created = api::post_review(&self.client, &self.base_url, self.id_token.as_deref(), review).await?;
        info!(movie_id = %review.movie_id, review_id = %created.id, "Review created");
        Ok(created)
    }

    async fn delete_review(&self, id: &ReviewId, movie_id: &MovieId) -> Result<String, SourceError> {
        let message = api::delete_review(&self.client, &self.base_url, self.id_token.as_deref(), id, movie_id).await?;
        info!(movie_id = %movie_id, review_id = %id, "Review deleted");
        Ok(message)
    }
}

#[async_trait]
impl Catalog for HttpBackend {
    async fn casting(&self, movie_id: &MovieId) -> Result<Vec<Actor>, SourceError> {
        api::get_casting(&self.client, &self.base_url, movie_id).await
    }

    async fn actor(&self, actor_id: &str) -> Result<ActorProfile, SourceError> {
        api::get_actor(&self.client, &self.base_url, actor_id).await
    }

    async fn movies_by_actor(&self, actor_id: &str) -> Result<Vec<MoviePoster>, SourceError> {
        api::get_movies_by_actor(&self.client, &self.base_url, actor_id).await
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<Vec<MoviePoster>, SourceError> {
        api::search_movies(&self.client, &self.base_url, query, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_trims_base_url_and_empty_token() {
        let mut config = Config::default();
        config.backend.url = "https://reviews.example.com/api/".to_string();

        let backend = HttpBackend::new(&config).with_id_token(Some(String::new()));
        assert_eq!(backend.base_url(), "https://reviews.example.com/api");
        assert!(!backend.is_authenticated());

        let backend = backend.with_id_token(Some("token".to_string()));
        assert!(backend.is_authenticated());
    }
}
