use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const UID_KEY: &str = "session_uid";
const DISPLAY_NAME_KEY: &str = "session_display_name";
const PHOTO_URL_KEY: &str = "session_photo_url";
const EMAIL_VERIFIED_KEY: &str = "session_email_verified";
const ID_TOKEN_KEY: &str = "session_id_token";
const SIGNED_IN_AT_KEY: &str = "session_signed_in_at";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// The signed-in session as persisted in the credentials file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool, // Verified accounts publish as critics
    pub id_token: Option<String>,
    pub signed_in_at: Option<DateTime<Utc>>,
}

/// Key/value credentials file holding the current session
pub struct SessionStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    /// Current session, if a uid has been stored
    pub fn session(&self) -> Option<StoredSession> {
        let uid = self.get(UID_KEY).filter(|uid| !uid.is_empty())?.clone();
        Some(StoredSession {
            uid,
            display_name: self.get(DISPLAY_NAME_KEY).cloned(),
            photo_url: self.get(PHOTO_URL_KEY).cloned(),
            email_verified: self
                .get(EMAIL_VERIFIED_KEY)
                .map(|v| v == "true")
                .unwrap_or(false),
            id_token: self.get(ID_TOKEN_KEY).cloned(),
            signed_in_at: self
                .get(SIGNED_IN_AT_KEY)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }

    pub fn set_session(&mut self, session: StoredSession) {
        self.clear_session();
        self.set(UID_KEY.to_string(), session.uid);
        if let Some(name) = session.display_name {
            self.set(DISPLAY_NAME_KEY.to_string(), name);
        }
        if let Some(photo) = session.photo_url {
            self.set(PHOTO_URL_KEY.to_string(), photo);
        }
        self.set(EMAIL_VERIFIED_KEY.to_string(), session.email_verified.to_string());
        if let Some(token) = session.id_token {
            self.set(ID_TOKEN_KEY.to_string(), token);
        }
        let signed_in_at = session.signed_in_at.unwrap_or_else(Utc::now);
        self.set(SIGNED_IN_AT_KEY.to_string(), signed_in_at.to_rfc3339());
    }

    pub fn clear_session(&mut self) {
        for key in [UID_KEY, DISPLAY_NAME_KEY, PHOTO_URL_KEY, EMAIL_VERIFIED_KEY, ID_TOKEN_KEY, SIGNED_IN_AT_KEY] {
            self.remove(key);
        }
    }

    pub fn id_token(&self) -> Option<&String> {
        self.get(ID_TOKEN_KEY)
    }
}
