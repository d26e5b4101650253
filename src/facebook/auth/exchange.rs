//! Trade a Graph API access token for a long-lived one.

use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::facebook::utils::{check_status, ServerError};
use crate::facebook::{GRAPH_API_VERSION, GRAPH_BASE_URL};

use super::ExchangeRequest;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
    #[error("encoding query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("malformed response: {0}")]
    Malformed(#[from] MalformedResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedResponse {
    #[error("no access token")]
    MissingAccessToken,
    #[error("no expiry")]
    MissingExpiry,
}

pub struct GraphTokenExchange {
    pub client: reqwest::Client,
    base_url: String,
}

impl GraphTokenExchange {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: GRAPH_BASE_URL.to_owned(),
        }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    fn token_url(&self) -> String {
        format!(
            "{base}/{version}/oauth/access_token",
            base = self.base_url.trim_end_matches('/'),
            version = GRAPH_API_VERSION,
        )
    }

    /// Call the exchange endpoint once.
    pub async fn perform(&self, request: ExchangeRequest<'_>) -> Result<ExchangeResponse, Error> {
        let params = &[
            ("grant_type", "fb_exchange_token"),
            ("client_id", request.client_id),
            ("client_secret", request.client_secret.expose_secret().as_str()),
            ("fb_exchange_token", request.token),
        ];
        let query = serde_urlencoded::to_string(params)?;
        let url = format!("{}?{}", self.token_url(), query);

        // The query string holds the client secret, keep it out of error messages.
        let req = self
            .client
            .get(url)
            .build()
            .map_err(reqwest::Error::without_url)?;

        let res = self
            .client
            .execute(req)
            .await
            .map_err(reqwest::Error::without_url)?;
        let res = check_status(res).await?;
        let exchange_response = res.json().await.map_err(reqwest::Error::without_url)?;
        Ok(exchange_response)
    }
}

#[derive(Debug, Deserialize)]
pub struct ExchangeResponse {
    /// The long-lived access token.
    #[serde(default)]
    access_token: String,
    /// Lifetime of the token in seconds, usually about 60 days.
    expires_in: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongLivedToken {
    pub access_token: String,
    pub expires_in: u64,
}

impl TryFrom<ExchangeResponse> for LongLivedToken {
    type Error = MalformedResponse;

    fn try_from(response: ExchangeResponse) -> Result<Self, Self::Error> {
        let ExchangeResponse {
            access_token,
            expires_in,
        } = response;
        if access_token.is_empty() {
            return Err(MalformedResponse::MissingAccessToken);
        }
        let expires_in = expires_in.ok_or(MalformedResponse::MissingExpiry)?;
        Ok(Self {
            access_token,
            expires_in,
        })
    }
}

#[async_trait::async_trait]
impl super::TokenExchanger for GraphTokenExchange {
    type Token = LongLivedToken;
    type Error = Error;

    async fn exchange(&self, request: ExchangeRequest<'_>) -> Result<Self::Token, Self::Error> {
        let exchange_response = self.perform(request).await?;
        let token = LongLivedToken::try_from(exchange_response)?;
        Ok(token)
    }
}

impl super::Token for LongLivedToken {
    fn access_token(&self) -> &str {
        self.access_token.as_str()
    }
}

impl super::ExpiringToken for LongLivedToken {
    fn expires_in(&self) -> u64 {
        self.expires_in
    }
}
