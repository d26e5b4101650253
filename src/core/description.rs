//! Static metadata a credential type publishes to the host's UI.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescription {
    pub name: &'static str,
    pub display_name: &'static str,
    pub extends: Vec<&'static str>,
    pub documentation_url: &'static str,
    pub properties: Vec<Property>,
    pub test: TestRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    String,
    Password,
    Number,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: PropertyKind,
    /// Not shown to the user. Either fixed or maintained by the host.
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    pub required: bool,
    /// The host overwrites this field with values returned by the pre-request hook.
    pub host_refreshable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl Property {
    pub fn new(name: &'static str, display_name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            display_name,
            kind,
            hidden: false,
            default: None,
            required: false,
            host_refreshable: false,
            min_length: None,
            description: None,
        }
    }

    /// A hidden field with a value fixed by the credential type.
    pub fn fixed(name: &'static str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            default: Some(value.into()),
            ..Self::new(name, name, PropertyKind::String).hidden()
        }
    }

    pub fn hidden(self) -> Self {
        Self {
            hidden: true,
            ..self
        }
    }

    pub fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub fn host_refreshable(self) -> Self {
        Self {
            host_refreshable: true,
            ..self
        }
    }

    pub fn min_length(self, min_length: usize) -> Self {
        Self {
            min_length: Some(min_length),
            ..self
        }
    }

    pub fn default_value(self, value: impl Into<serde_json::Value>) -> Self {
        Self {
            default: Some(value.into()),
            ..self
        }
    }

    pub fn description(self, description: &'static str) -> Self {
        Self {
            description: Some(description),
            ..self
        }
    }

    fn check(&self, value: Option<&str>) -> Option<FieldViolation> {
        let value = value.filter(|value| !value.is_empty());
        match (value, self.min_length) {
            (None, _) if self.required => Some(FieldViolation::Missing(self.name)),
            (Some(value), Some(min)) if value.chars().count() < min => {
                Some(FieldViolation::TooShort {
                    name: self.name,
                    min,
                })
            }
            _ => None,
        }
    }
}

/// Request the host's credential tester runs to check a credential works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub method: &'static str,
    pub base_url: String,
    pub path: &'static str,
    pub query: Vec<(&'static str, &'static str)>,
}

impl TestRequest {
    /// Send the same request to another host, such as a proxy or a mock server.
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldViolation {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{name} must be at least {min} characters long")]
    TooShort { name: &'static str, min: usize },
}

impl CredentialDescription {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Check user input against the declared fields.
    ///
    /// Hidden fields are skipped since the user never fills them in.
    pub fn validate(&self, values: &HashMap<String, String>) -> Result<(), Vec<FieldViolation>> {
        let violations: Vec<_> = self
            .properties
            .iter()
            .filter(|property| !property.hidden)
            .filter_map(|property| property.check(values.get(property.name).map(String::as_str)))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
