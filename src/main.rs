use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use fb_graph_credential::{
    core::{CredentialRecord, PreRequestHook, Timestamp},
    facebook::{
        self,
        auth::{exchange::GraphTokenExchange, refresh_policy::RefreshPolicy},
        credential, test_request,
    },
    telemetry,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let reqwest_client = reqwest::Client::new();

    let base_url = optenv("FACEBOOK_GRAPH_BASE_URL")
        .unwrap_or_else(|| facebook::GRAPH_BASE_URL.to_owned());

    let mut record = CredentialRecord::new(
        getenv("FACEBOOK_CLIENT_ID")?,
        getenv("FACEBOOK_CLIENT_SECRET")?,
    );
    record.short_lived_token = optenv("FACEBOOK_SHORT_LIVED_TOKEN");
    record.long_lived_token = optenv("FACEBOOK_LONG_LIVED_TOKEN").unwrap_or_default();
    record.token_expires_at = match optenv("FACEBOOK_TOKEN_EXPIRES_AT") {
        Some(value) => value
            .parse()
            .context("FACEBOOK_TOKEN_EXPIRES_AT is not a unix timestamp")?,
        None => 0,
    };

    let exchange = GraphTokenExchange::new(reqwest_client.clone()).with_base_url(base_url.clone());
    let policy = RefreshPolicy::new(exchange);
    info!(
        message = "Refresh policy ready",
        freshness_threshold_secs = policy.config().freshness_threshold_secs,
        reuse_long_lived_token = policy.config().reuse_long_lived_token,
    );
    let hook: Box<dyn PreRequestHook> = Box::new(policy);

    let patch = hook.before_request(unix_now()?, &record).await;
    if let Some(patch) = &patch {
        info!(message = "Credential refreshed", token_expires_at = patch.token_expires_at);
        record.apply(patch.clone());
    }

    let access_token = record
        .long_lived_token()
        .or_else(|| record.short_lived_token())
        .context("no access token to test the credential with")?;

    let test = credential::description().test.with_base_url(base_url);
    match test_request::run(&reqwest_client, &test, access_token).await {
        Ok(profile) => info!(message = "Connection test passed", profile = ?profile),
        Err(err) => warn!(message = "Connection test failed", error = %err),
    }

    println!("{}", serde_json::to_string_pretty(&patch)?);

    Ok(())
}

fn unix_now() -> anyhow::Result<Timestamp> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(elapsed.as_secs().try_into()?)
}

fn getenv(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("env var {} is not set", key))
}

fn optenv(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
