//! What the host needs to know to render and test a Facebook Graph credential.

use crate::core::description::{CredentialDescription, Property, PropertyKind, TestRequest};

use super::{GRAPH_API_VERSION, GRAPH_BASE_URL};

pub const NAME: &str = "facebookGraphOAuth2Api";

pub const AUTHORIZATION_URL: &str = "https://www.facebook.com/v20.0/dialog/oauth";
pub const ACCESS_TOKEN_URL: &str = "https://graph.facebook.com/v20.0/oauth/access_token";
pub const SCOPE: &str = concat!(
    "public_profile,email,business_management,",
    "pages_show_list,pages_read_engagement,pages_manage_metadata,pages_manage_posts,pages_messaging,",
    "instagram_basic,instagram_manage_messages,instagram_manage_comments,instagram_content_publish",
);

/// Facebook rejects webhook subscriptions whose verify token is shorter.
pub const WEBHOOK_VERIFY_TOKEN_MIN_LENGTH: usize = 20;

pub fn description() -> CredentialDescription {
    CredentialDescription {
        name: NAME,
        display_name: "Facebook Graph OAuth2 API",
        extends: vec!["oAuth2Api"],
        documentation_url: "https://developers.facebook.com/docs/graph-api/overview",
        properties: vec![
            Property::fixed("grantType", "authorizationCode"),
            Property::fixed("authUrl", AUTHORIZATION_URL),
            Property::fixed("accessTokenUrl", ACCESS_TOKEN_URL),
            Property::fixed("scope", SCOPE),
            Property::fixed("authQueryParameters", ""),
            Property::fixed("authentication", "header"),
            Property::new("clientId", "Client ID", PropertyKind::String).required(),
            Property::new("clientSecret", "Client Secret", PropertyKind::Password).required(),
            Property::new(
                "webhookVerifyToken",
                "Webhook Verify Token",
                PropertyKind::Password,
            )
            .min_length(WEBHOOK_VERIFY_TOKEN_MIN_LENGTH)
            .description("Token Facebook echoes back when verifying a webhook subscription"),
            Property::new("longLivedToken", "Long-Lived Token", PropertyKind::String)
                .hidden()
                .default_value("")
                .host_refreshable(),
            Property::new("tokenExpiresAt", "Token Expires At", PropertyKind::Number)
                .hidden()
                .default_value(0)
                .host_refreshable(),
        ],
        test: connection_test(),
    }
}

/// `GET /me?fields=id,name` with the credential's bearer token.
pub fn connection_test() -> TestRequest {
    TestRequest {
        method: "GET",
        base_url: GRAPH_BASE_URL.to_owned(),
        path: "/v20.0/me",
        query: vec![("fields", "id,name")],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::description::FieldViolation;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn oauth_urls_match_graph_version() {
        assert!(AUTHORIZATION_URL.contains(GRAPH_API_VERSION));
        assert!(ACCESS_TOKEN_URL.starts_with(GRAPH_BASE_URL));
        assert!(ACCESS_TOKEN_URL.contains(GRAPH_API_VERSION));
        assert!(connection_test().path.contains(GRAPH_API_VERSION));
    }

    #[test]
    fn token_fields_are_hidden_and_host_refreshable() {
        let description = description();
        for (name, kind) in [
            ("longLivedToken", PropertyKind::String),
            ("tokenExpiresAt", PropertyKind::Number),
        ] {
            let property = description.property(name).unwrap();
            assert_eq!(property.kind, kind);
            assert!(property.hidden);
            assert!(property.host_refreshable);
        }
        assert!(!description.property("clientId").unwrap().host_refreshable);
    }

    #[test]
    fn accepts_complete_input_without_webhook_token() {
        let input = values(&[("clientId", "123"), ("clientSecret", "abc")]);
        assert_eq!(description().validate(&input), Ok(()));
    }

    #[test]
    fn reports_missing_client_credentials() {
        let input = values(&[("clientId", "")]);
        assert_eq!(
            description().validate(&input),
            Err(vec![
                FieldViolation::Missing("clientId"),
                FieldViolation::Missing("clientSecret"),
            ])
        );
    }

    #[test]
    fn rejects_short_webhook_verify_token() {
        let input = values(&[
            ("clientId", "123"),
            ("clientSecret", "abc"),
            ("webhookVerifyToken", "too-short"),
        ]);
        assert_eq!(
            description().validate(&input),
            Err(vec![FieldViolation::TooShort {
                name: "webhookVerifyToken",
                min: 20,
            }])
        );

        let input = values(&[
            ("clientId", "123"),
            ("clientSecret", "abc"),
            ("webhookVerifyToken", "exactly-twenty-chars"),
        ]);
        assert_eq!(description().validate(&input), Ok(()));
    }

    #[test]
    fn serializes_for_the_host_ui() {
        let json = serde_json::to_value(description()).unwrap();
        assert_eq!(json["name"], "facebookGraphOAuth2Api");
        assert_eq!(json["test"]["path"], "/v20.0/me");
        let scope = json["properties"]
            .as_array()
            .unwrap()
            .iter()
            .find(|property| property["name"] == "scope")
            .unwrap();
        assert_eq!(scope["kind"], "string");
        assert_eq!(scope["hidden"], true);
        assert_eq!(scope["default"], SCOPE);

        let expires_at = json["properties"]
            .as_array()
            .unwrap()
            .iter()
            .find(|property| property["name"] == "tokenExpiresAt")
            .unwrap();
        assert_eq!(expires_at["kind"], "number");
        assert_eq!(expires_at["default"], 0);
    }

    #[test]
    fn scope_covers_pages_and_instagram() {
        let scopes: Vec<_> = SCOPE.split(',').collect();
        for needed in [
            "pages_show_list",
            "pages_manage_metadata",
            "instagram_basic",
            "instagram_manage_messages",
            "instagram_manage_comments",
        ] {
            assert!(scopes.contains(&needed), "missing scope {needed}");
        }
        assert!(scopes.iter().all(|scope| !scope.is_empty()));
    }

    #[test]
    fn connection_test_targets_graph_api() {
        let test = connection_test();
        assert_eq!(test.url(), "https://graph.facebook.com/v20.0/me");

        let test = test.with_base_url("http://127.0.0.1:8080/");
        assert_eq!(test.url(), "http://127.0.0.1:8080/v20.0/me");
    }
}
