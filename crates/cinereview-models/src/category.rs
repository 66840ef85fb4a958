use serde::{Deserialize, Serialize};
use std::fmt;

/// The two review categories shown for a movie
///
/// Membership is decided by the reviewer's trust status when the review was
/// written and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Critics,
    Spectators,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Critics, Category::Spectators];

    pub fn for_trust(is_trusted: bool) -> Self {
        if is_trusted {
            Category::Critics
        } else {
            Category::Spectators
        }
    }

    pub fn is_trusted(self) -> bool {
        matches!(self, Category::Critics)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Critics => "critics",
            Category::Spectators => "spectators",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
