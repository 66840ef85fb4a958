use serde::{Deserialize, Serialize};

/// Whoever is currently using the client
///
/// Absence of a viewer (anonymous browsing) is modelled as `Option<ViewerIdentity>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewerIdentity {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    pub is_trusted: bool, // Trusted viewers publish as critics
}

impl ViewerIdentity {
    pub fn new(id: impl Into<String>, is_trusted: bool) -> Self {
        Self {
            id: id.into(),
            display_name: String::new(),
            avatar_url: String::new(),
            is_trusted,
        }
    }

    pub fn with_profile(mut self, display_name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self.avatar_url = avatar_url.into();
        self
    }
}
