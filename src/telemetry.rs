//! Log setup for binaries embedding the credential.

use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::MakeWriter,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// HTTP crates that log request lines, query string included, below INFO.
/// The token exchange sends the client secret in that query string.
const URL_LOGGING_TARGETS: &[&str] = &["reqwest", "hyper"];

/// `fmt` subscriber honoring `filter`, with the HTTP stack capped at INFO
/// whatever the filter asks for.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let http_cap = URL_LOGGING_TARGETS.iter().fold(
        Targets::new().with_default(LevelFilter::TRACE),
        |targets, target| targets.with_target(*target, LevelFilter::INFO),
    );

    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_filter(http_cap),
    )
}

/// Install the subscriber globally, filtered by `RUST_LOG`, writing to stderr.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    subscriber(filter, std::io::stderr).init();
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use serde_json::json;
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{
        core::CredentialRecord,
        facebook::auth::{exchange::GraphTokenExchange, refresh_policy::RefreshPolicy},
    };

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Captured {
        type Writer = Captured;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    // Installs the global subscriber, so it is the only test in the crate that may do so.
    #[tokio::test]
    async fn trace_logs_of_a_refresh_hold_no_secrets() {
        let captured = Captured::default();
        subscriber(EnvFilter::new("trace,wiremock=off"), captured.clone())
            .try_init()
            .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "NEWLONGLIVEDVALUE",
                "expires_in": 5184000,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let policy =
            RefreshPolicy::new(GraphTokenExchange::new(client).with_base_url(server.uri()));
        let mut record = CredentialRecord::new("app", "TOPSECRETVALUE");
        record.short_lived_token = Some("SHORTLIVEDVALUE".into());

        let patch = policy.refresh(1_700_000_000, &record).await.unwrap();
        assert_eq!(patch.long_lived_token, "NEWLONGLIVEDVALUE");

        let logs = captured.contents();
        assert!(logs.contains("exchanging"), "policy logs missing: {logs}");
        for secret in ["TOPSECRETVALUE", "SHORTLIVEDVALUE", "NEWLONGLIVEDVALUE"] {
            assert!(!logs.contains(secret), "{secret} leaked into logs: {logs}");
        }
    }
}
