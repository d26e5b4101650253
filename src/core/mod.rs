use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub mod description;

/// Unix time in seconds.
pub type Timestamp = i64;

/// Credential state as the host stores it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Token handed back by the host's authorization-code flow, if it ran.
    #[serde(default)]
    pub short_lived_token: Option<String>,
    #[serde(default)]
    pub long_lived_token: String,
    /// Zero until a long-lived token has been stored.
    #[serde(default)]
    pub token_expires_at: Timestamp,
    #[serde(default)]
    pub webhook_verify_token: Option<String>,
}

impl CredentialRecord {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            short_lived_token: None,
            long_lived_token: String::new(),
            token_expires_at: 0,
            webhook_verify_token: None,
        }
    }

    pub fn long_lived_token(&self) -> Option<&str> {
        Some(self.long_lived_token.as_str()).filter(|token| !token.is_empty())
    }

    pub fn short_lived_token(&self) -> Option<&str> {
        self.short_lived_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    /// Merge a patch the same way the host persists it.
    pub fn apply(&mut self, patch: RecordPatch) {
        let RecordPatch {
            long_lived_token,
            token_expires_at,
        } = patch;
        self.long_lived_token = long_lived_token;
        self.token_expires_at = token_expires_at;
    }
}

/// Fields the host has to persist after a successful refresh.
///
/// Token and expiry always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub long_lived_token: String,
    pub token_expires_at: Timestamp,
}

/// Step the host runs before every outbound request made with a credential.
#[async_trait::async_trait]
pub trait PreRequestHook: Send + Sync {
    /// Returns the patch to persist, or `None` to leave the record untouched.
    async fn before_request(
        &self,
        now: Timestamp,
        record: &CredentialRecord,
    ) -> Option<RecordPatch>;
}
