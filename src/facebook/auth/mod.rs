//! Long-lived token handling.

use secrecy::SecretString;

use crate::core::Timestamp;

pub mod exchange;
pub mod refresh_policy;

/// Inputs of a single token exchange.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a SecretString,
    /// Short-lived or long-lived token to trade in.
    pub token: &'a str,
}

#[async_trait::async_trait]
pub trait TokenExchanger: Send + Sync {
    type Token: ExpiringToken;
    type Error: std::fmt::Display + Send + Sync;

    async fn exchange(&self, request: ExchangeRequest<'_>) -> Result<Self::Token, Self::Error>;
}

pub trait Token: Send {
    fn access_token(&self) -> &str;
}

pub trait ExpiringToken: Token {
    /// Seconds the token stays valid, counted from when it was issued.
    fn expires_in(&self) -> u64;

    fn expires_at(&self, issued_at: Timestamp) -> Timestamp {
        let expires_in = i64::try_from(self.expires_in()).unwrap_or(i64::MAX);
        issued_at.saturating_add(expires_in)
    }
}
