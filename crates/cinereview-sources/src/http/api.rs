use cinereview_models::{Actor, ActorProfile, MovieId, MoviePoster, NewReview, Review, ReviewId};
use indexmap::IndexMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::traits::{CreatedReview, FetchedReviews};

/// Movie id as the backend encodes it (numeric for catalog movies)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
enum WireMovieId {
    Number(u64),
    Text(String),
}

impl From<&MovieId> for WireMovieId {
    fn from(id: &MovieId) -> Self {
        id.as_str()
            .parse::<u64>()
            .map(WireMovieId::Number)
            .unwrap_or_else(|_| WireMovieId::Text(id.as_str().to_string()))
    }
}

impl From<WireMovieId> for MovieId {
    fn from(id: WireMovieId) -> Self {
        match id {
            WireMovieId::Number(n) => MovieId::new(n.to_string()),
            WireMovieId::Text(s) => MovieId::new(s),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReview {
    movie_id: WireMovieId,
    uid: String,
    #[serde(default)]
    username: String,
    #[serde(rename = "photoURL", default)]
    photo_url: String,
    score: u8,
    text: String,
}

impl WireReview {
    /// Category is not on the wire; it comes from the map the review was listed in
    fn into_review(self, id: String, is_trusted: bool) -> Review {
        Review {
            id: ReviewId::new(id),
            movie_id: self.movie_id.into(),
            reviewer_id: self.uid,
            reviewer_name: self.username,
            reviewer_avatar: self.photo_url,
            score: self.score,
            text: self.text,
            is_trusted,
        }
    }
}

impl From<&NewReview> for WireReview {
    fn from(review: &NewReview) -> Self {
        Self {
            movie_id: (&review.movie_id).into(),
            uid: review.reviewer_id.clone(),
            username: review.reviewer_name.clone(),
            photo_url: review.reviewer_avatar.clone(),
            score: review.score,
            text: review.text.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct WireReviewSet {
    #[serde(default)]
    critics: IndexMap<String, WireReview>,
    #[serde(default)]
    spectators: IndexMap<String, WireReview>,
}

impl From<WireReviewSet> for FetchedReviews {
    fn from(set: WireReviewSet) -> Self {
        FetchedReviews {
            critics: set
                .critics
                .into_iter()
                .map(|(id, review)| review.into_review(id, true))
                .collect(),
            spectators: set
                .spectators
                .into_iter()
                .map(|(id, review)| review.into_review(id, false))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCreated {
    #[serde(default)]
    message: String,
    review_id: String,
}

/// Attach the session token to mutating calls when one is available
fn with_auth(request: RequestBuilder, id_token: Option<&str>) -> RequestBuilder {
    match id_token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn error_for_status(operation: &'static str, response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.trim().to_string()
    };
    warn!("{} failed with HTTP {}: {}", operation, status, message);

    Err(status_error(operation, status, message))
}

/// Map a non-success status to the transport error the core reports
fn status_error(operation: &'static str, status: StatusCode, message: String) -> SourceError {
    match status {
        StatusCode::NOT_FOUND => SourceError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => SourceError::Rejected(message),
        _ => SourceError::Status {
            operation,
            status: status.as_u16(),
            message,
        },
    }
}

async fn json_body<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T, SourceError> {
    let body = response.text().await?;
    decode_body(operation, &body)
}

/// Decode a JSON body, treating an empty body as an unexpected response
fn decode_body<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T, SourceError> {
    if body.trim().is_empty() {
        return Err(SourceError::unexpected(operation, "empty response body"));
    }
    serde_json::from_str(body).map_err(|e| SourceError::unexpected(operation, e.to_string()))
}

/// Confirmation messages arrive either as a JSON string or as plain text
fn confirmation_message(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.trim().to_string())
}

fn parse_review_set(body: &str) -> Result<FetchedReviews, SourceError> {
    let set: WireReviewSet =
        serde_json::from_str(body).map_err(|e| SourceError::unexpected("fetch_reviews", e.to_string()))?;
    Ok(set.into())
}

pub async fn get_reviews(client: &Client, base_url: &str, movie_id: &MovieId) -> Result<FetchedReviews, SourceError> {
    let url = format!("{}/reviews", base_url);
    let response = client
        .get(&url)
        .query(&[("movie_id", movie_id.as_str())])
        .send()
        .await?;
    let response = error_for_status("fetch_reviews", response).await?;

    let body = response.text().await?;
    let reviews = if body.trim().is_empty() {
        FetchedReviews::default()
    } else {
        parse_review_set(&body)?
    };
    debug!(
        movie_id = %movie_id,
        critics = reviews.critics.len(),
        spectators = reviews.spectators.len(),
        "Fetched reviews"
    );
    Ok(reviews)
}

pub async fn post_review(
    client: &Client,
    base_url: &str,
    id_token: Option<&str>,
    review: &NewReview,
) -> Result<CreatedReview, SourceError> {
    let url = format!("{}/reviews", base_url);
    let request = client.post(&url).json(&WireReview::from(review));
    let response = with_auth(request, id_token).send().await?;
    let response = error_for_status("create_review", response).await?;

    let created: WireCreated = json_body("create_review", response).await?;
    if created.review_id.is_empty() {
        return Err(SourceError::unexpected("create_review", "store did not assign a review id"));
    }
    Ok(CreatedReview {
        id: ReviewId::new(created.review_id),
        message: created.message,
    })
}

pub async fn delete_review(
    client: &Client,
    base_url: &str,
    id_token: Option<&str>,
    review_id: &ReviewId,
    movie_id: &MovieId,
) -> Result<String, SourceError> {
    let url = format!("{}/reviews", base_url);
    let request = client
        .delete(&url)
        .query(&[("review_id", review_id.as_str()), ("movie_id", movie_id.as_str())]);
    let response = with_auth(request, id_token).send().await?;
    let response = error_for_status("delete_review", response).await?;

    let body = response.text().await?;
    Ok(confirmation_message(&body))
}

pub async fn get_casting(client: &Client, base_url: &str, movie_id: &MovieId) -> Result<Vec<Actor>, SourceError> {
    let url = format!("{}/actors/casting", base_url);
    let response = client
        .get(&url)
        .query(&[("movie_id", movie_id.as_str())])
        .send()
        .await?;
    let response = error_for_status("casting", response).await?;
    json_body("casting", response).await
}

pub async fn get_actor(client: &Client, base_url: &str, actor_id: &str) -> Result<ActorProfile, SourceError> {
    let url = format!("{}/actors", base_url);
    let response = client.get(&url).query(&[("actor_id", actor_id)]).send().await?;
    let response = error_for_status("actor", response).await?;
    json_body("actor", response).await
}

pub async fn get_movies_by_actor(client: &Client, base_url: &str, actor_id: &str) -> Result<Vec<MoviePoster>, SourceError> {
    let url = format!("{}/actors/movies", base_url);
    let response = client.get(&url).query(&[("actor_id", actor_id)]).send().await?;
    let response = error_for_status("movies_by_actor", response).await?;
    json_body("movies_by_actor", response).await
}

pub async fn search_movies(client: &Client, base_url: &str, query: &str, page: u32) -> Result<Vec<MoviePoster>, SourceError> {
    let url = format!("{}/movies/search", base_url);
    let page = page.to_string();
    let response = client
        .get(&url)
        .query(&[("query", query), ("page", page.as_str())])
        .send()
        .await?;
    let response = error_for_status("search_movies", response).await?;
    json_body("search_movies", response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_set_keeps_category_and_order() {
        let body = r#"{
            "critics": {
                "c2": {"movieId": 42, "uid": "u7", "username": "Roger", "photoURL": "", "score": 4, "text": "Solid"},
                "c1": {"movieId": 42, "uid": "u8", "username": "Pauline", "photoURL": "p.png", "score": 2, "text": "Meh"}
            },
            "spectators": {
                "s1": {"movieId": 42, "uid": "u1", "score": 5, "text": "Great film"}
            }
        }"#;

        let reviews = parse_review_set(body).unwrap();
        let critic_ids: Vec<&str> = reviews.critics.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(critic_ids, vec!["c2", "c1"]);
        assert!(reviews.critics.iter().all(|r| r.is_trusted));
        assert_eq!(reviews.critics[1].reviewer_avatar, "p.png");

        assert_eq!(reviews.spectators.len(), 1);
        let spectator = &reviews.spectators[0];
        assert!(!spectator.is_trusted);
        assert_eq!(spectator.movie_id.as_str(), "42");
        assert_eq!(spectator.reviewer_id, "u1");
        assert_eq!(spectator.reviewer_name, "");
    }

    #[test]
    fn test_review_set_missing_category_is_empty() {
        let reviews = parse_review_set(r#"{"critics": {}}"#).unwrap();
        assert!(reviews.is_empty());
    }

    #[test]
    fn test_malformed_review_set_is_unexpected() {
        let err = parse_review_set(r#"{"critics": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::Unexpected { operation: "fetch_reviews", .. }));
    }

    #[test]
    fn test_new_review_wire_shape() {
        let review = NewReview {
            movie_id: MovieId::new("42"),
            reviewer_id: "u1".to_string(),
            reviewer_name: "Ada".to_string(),
            reviewer_avatar: String::new(),
            score: 5,
            text: "Great film".to_string(),
            is_trusted: false,
        };
        let json = serde_json::to_value(WireReview::from(&review)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "movieId": 42,
                "uid": "u1",
                "username": "Ada",
                "photoURL": "",
                "score": 5,
                "text": "Great film"
            })
        );
    }

    #[test]
    fn test_non_numeric_movie_id_stays_text() {
        let id = MovieId::new("tt0111161");
        let wire = WireMovieId::from(&id);
        assert_eq!(wire, WireMovieId::Text("tt0111161".to_string()));
        assert_eq!(MovieId::from(wire), id);
    }

    #[test]
    fn test_status_error_mapping() {
        let err = status_error("delete_review", StatusCode::NOT_FOUND, "no such review".to_string());
        assert!(matches!(err, SourceError::NotFound(ref message) if message == "no such review"));
        assert!(err.is_not_found());

        for status in [StatusCode::BAD_REQUEST, StatusCode::UNPROCESSABLE_ENTITY] {
            let err = status_error("create_review", status, "score out of range".to_string());
            assert!(matches!(err, SourceError::Rejected(ref message) if message == "score out of range"));
        }

        for status in [StatusCode::UNAUTHORIZED, StatusCode::INTERNAL_SERVER_ERROR, StatusCode::SERVICE_UNAVAILABLE] {
            let err = status_error("fetch_reviews", status, "down".to_string());
            match err {
                SourceError::Status { operation, status: code, message } => {
                    assert_eq!(operation, "fetch_reviews");
                    assert_eq!(code, status.as_u16());
                    assert_eq!(message, "down");
                }
                other => panic!("expected Status error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_empty_body_is_unexpected() {
        for body in ["", "  \n"] {
            let err = decode_body::<Vec<Actor>>("casting", body).unwrap_err();
            assert!(matches!(err, SourceError::Unexpected { operation: "casting", .. }));
            assert!(!err.is_not_found());
        }

        let err = decode_body::<ActorProfile>("actor", "not json").unwrap_err();
        assert!(matches!(err, SourceError::Unexpected { operation: "actor", .. }));
    }

    #[test]
    fn test_decode_catalog_body() {
        let cast: Vec<Actor> =
            decode_body("casting", r#"[{"id": 3, "name": "Sigourney Weaver", "character": "Ripley"}]"#).unwrap();
        assert_eq!(cast.len(), 1);
        assert_eq!(cast[0].character, "Ripley");
        assert_eq!(cast[0].profile_path, None);
    }

    #[test]
    fn test_confirmation_message_formats() {
        assert_eq!(confirmation_message("\"Review deleted\""), "Review deleted");
        assert_eq!(confirmation_message("Review deleted\n"), "Review deleted");
    }
}
