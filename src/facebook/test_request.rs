//! Run the connectivity check declared by [`super::credential::connection_test`].

use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use crate::core::description::TestRequest;

use super::utils::{check_status, ServerError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
    #[error("unsupported method {0}")]
    UnsupportedMethod(&'static str),
}

/// The account the token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Send `test` authorized with `access_token`.
///
/// Any 2xx response counts as success. The profile is returned when the body
/// can be read as one.
pub async fn run(
    client: &reqwest::Client,
    test: &TestRequest,
    access_token: &str,
) -> Result<Option<Profile>, Error> {
    let method = Method::from_bytes(test.method.as_bytes())
        .map_err(|_| Error::UnsupportedMethod(test.method))?;
    let req = client
        .request(method, test.url())
        .query(&test.query)
        .bearer_auth(access_token)
        .build()?;

    let res = client.execute(req).await?;
    let res = check_status(res).await?;

    match res.json::<Profile>().await {
        Ok(profile) => Ok(Some(profile)),
        Err(err) => {
            debug!(message = "Connection test body is not a profile", error = %err);
            Ok(None)
        }
    }
}
