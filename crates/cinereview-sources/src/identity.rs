use async_trait::async_trait;
use cinereview_config::{SessionStore, StoredSession};
use cinereview_models::ViewerIdentity;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::traits::IdentityProvider;

/// Resolves the viewer from the session saved in the credentials file
pub struct SessionIdentityProvider {
    credentials_file: PathBuf,
}

impl SessionIdentityProvider {
    pub fn new(credentials_file: PathBuf) -> Self {
        Self { credentials_file }
    }

    fn load_session(&self) -> anyhow::Result<Option<StoredSession>> {
        let mut store = SessionStore::new(self.credentials_file.clone());
        store.load()?;
        Ok(store.session())
    }
}

/// Map a stored session to a viewer; verified accounts are trusted
pub fn viewer_from_session(session: StoredSession) -> ViewerIdentity {
    ViewerIdentity::new(session.uid, session.email_verified).with_profile(
        session.display_name.unwrap_or_default(),
        session.photo_url.unwrap_or_default(),
    )
}

#[async_trait]
impl IdentityProvider for SessionIdentityProvider {
    async fn resolve_viewer_identity(&self) -> Option<ViewerIdentity> {
        match self.load_session() {
            Ok(Some(session)) => {
                debug!(uid = %session.uid, "Resolved viewer from stored session");
                Some(viewer_from_session(session))
            }
            Ok(None) => {
                debug!("No stored session, browsing anonymously");
                None
            }
            Err(e) => {
                warn!(
                    "Failed to read session from {}: {}. Browsing anonymously.",
                    self.credentials_file.display(),
                    e
                );
                None
            }
        }
    }
}

/// Identity known up front (or explicitly anonymous)
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity(pub Option<ViewerIdentity>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn resolve_viewer_identity(&self) -> Option<ViewerIdentity> {
        self.0.clone()
    }
}
