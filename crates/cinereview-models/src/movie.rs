use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a movie as the backend knows it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Compact movie entry used by search results and actor filmographies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePoster {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>, // Backend sends "YYYY-MM-DD", sometimes empty
}

impl MoviePoster {
    /// Release year parsed from `release_date`, if present
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.parse().ok())
    }
}
