use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Category;
use crate::movie::MovieId;

/// Store-assigned identifier of a review
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(String);

impl ReviewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReviewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ReviewId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A review as submitted, before the store has assigned it an id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewReview {
    pub movie_id: MovieId,
    pub reviewer_id: String,
    pub reviewer_name: String,   // May be empty
    pub reviewer_avatar: String, // May be empty
    pub score: u8,               // 1-5, checked before submission
    pub text: String,
    pub is_trusted: bool,        // Reviewer trust at submission time
}

impl NewReview {
    /// Attach the id the store assigned on creation
    pub fn into_review(self, id: ReviewId) -> Review {
        Review {
            id,
            movie_id: self.movie_id,
            reviewer_id: self.reviewer_id,
            reviewer_name: self.reviewer_name,
            reviewer_avatar: self.reviewer_avatar,
            score: self.score,
            text: self.text,
            is_trusted: self.is_trusted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub movie_id: MovieId,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub reviewer_avatar: String,
    pub score: u8,
    pub text: String,
    pub is_trusted: bool,
}

impl Review {
    /// Category this review belongs to, fixed by the trust snapshot taken at submission
    pub fn category(&self) -> Category {
        Category::for_trust(self.is_trusted)
    }

    pub fn is_by(&self, reviewer_id: &str) -> bool {
        self.reviewer_id == reviewer_id
    }
}
