use serde::{Deserialize, Serialize};

/// Casting entry for a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorProfile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
}
