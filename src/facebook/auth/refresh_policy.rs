use tracing::{debug, info, warn};

use crate::core::{CredentialRecord, PreRequestHook, RecordPatch, Timestamp};

use super::{ExchangeRequest, ExpiringToken, Token, TokenExchanger};

/// A long-lived token expiring sooner than this is exchanged again.
pub const FRESHNESS_THRESHOLD_SECS: i64 = 3 * 86_400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    pub freshness_threshold_secs: i64,
    /// Trade the current long-lived token in for a new one instead of
    /// waiting for the host to hand over a new short-lived token.
    pub reuse_long_lived_token: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            freshness_threshold_secs: FRESHNESS_THRESHOLD_SECS,
            reuse_long_lived_token: true,
        }
    }
}

/// Keeps the long-lived token of a credential record from running out.
pub struct RefreshPolicy<Exchanger>
where
    Exchanger: TokenExchanger,
{
    exchanger: Exchanger,
    config: RefreshConfig,
}

impl<Exchanger> RefreshPolicy<Exchanger>
where
    Exchanger: TokenExchanger,
{
    pub fn new(exchanger: Exchanger) -> Self {
        Self::with_config(exchanger, RefreshConfig::default())
    }

    pub fn with_config(exchanger: Exchanger, config: RefreshConfig) -> Self {
        Self { exchanger, config }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn is_fresh(&self, now: Timestamp, record: &CredentialRecord) -> bool {
        let fresh_until = now.saturating_add(self.config.freshness_threshold_secs);
        record.long_lived_token().is_some() && record.token_expires_at > fresh_until
    }

    fn candidate<'r>(&self, record: &'r CredentialRecord) -> Option<&'r str> {
        let long_lived = record
            .long_lived_token()
            .filter(|_| self.config.reuse_long_lived_token);
        long_lived.or_else(|| record.short_lived_token())
    }

    /// Decide whether the record needs a new long-lived token and fetch it.
    ///
    /// Exchange failures are logged and reported as `None`, leaving the host
    /// to go ahead with whatever token it already has.
    pub async fn refresh(&self, now: Timestamp, record: &CredentialRecord) -> Option<RecordPatch> {
        if self.is_fresh(now, record) {
            debug!(
                message = "Using preexisting long-lived token",
                token_expires_at = record.token_expires_at
            );
            return None;
        }

        let token = match self.candidate(record) {
            Some(token) => token,
            None => {
                debug!(message = "No token available to exchange, skipping refresh");
                return None;
            }
        };

        info!(
            message = "Long-lived token missing or about to expire, exchanging",
            token_is_stale = record.long_lived_token().is_some(),
            token_expires_at = record.token_expires_at,
        );

        let request = ExchangeRequest {
            client_id: &record.client_id,
            client_secret: &record.client_secret,
            token,
        };
        let new_token = match self.exchanger.exchange(request).await {
            Ok(new_token) => new_token,
            Err(err) => {
                warn!(message = "Token exchange failed, keeping current credentials", error = %err);
                return None;
            }
        };

        if new_token.access_token().is_empty() {
            warn!(message = "Token exchange returned an empty token, keeping current credentials");
            return None;
        }

        let patch = RecordPatch {
            long_lived_token: new_token.access_token().to_owned(),
            token_expires_at: new_token.expires_at(now),
        };

        debug!(message = "Got new long-lived token", token_expires_at = patch.token_expires_at);

        Some(patch)
    }
}

#[async_trait::async_trait]
impl<Exchanger> PreRequestHook for RefreshPolicy<Exchanger>
where
    Exchanger: TokenExchanger,
{
    async fn before_request(
        &self,
        now: Timestamp,
        record: &CredentialRecord,
    ) -> Option<RecordPatch> {
        self.refresh(now, record).await
    }
}
