use crate::utils::Redact;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Debug};

/// Token represents an HCP access token.
///
/// The token is an opaque bearer string; it is never parsed beyond a non-emptiness
/// check and never written to the credential file.
#[derive(Clone, Default)]
pub struct Token {
    /// The access token.
    pub access_token: String,
    /// The expiration time of the token, when the exchange endpoint reported one.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// CredentialFile is the on-disk credential document consumed by HCP tooling
/// such as the `hcp` CLI.
///
/// The document is tagged by its `scheme`: `workload` carries instructions for
/// re-fetching a subject identity token, `service_principal_creds` carries the literal
/// client credentials.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum CredentialFile {
    /// Workload identity federation: the file embeds fetch instructions, not a secret.
    Workload {
        /// How a consumer derives a fresh identity token.
        workload: WorkloadFederation,
    },
    /// Service principal credentials: the file embeds the secret itself.
    ServicePrincipalCreds {
        /// The client credentials pair.
        oauth: OauthClientCredentials,
    },
}

impl CredentialFile {
    /// Parse a credential file from its JSON encoding.
    pub fn from_slice(content: &[u8]) -> Result<Self> {
        serde_json::from_slice(content)
            .map_err(|e| Error::unexpected("failed to parse credential file").with_source(e))
    }

    /// Serialize the credential file to its JSON encoding.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| Error::unexpected("failed to serialize credential file").with_source(e))
    }
}

/// WorkloadFederation instructs a consumer how to obtain a fresh subject identity
/// token and which identity provider to exchange it against.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkloadFederation {
    /// Resource name of the workload identity provider configured on HCP.
    pub provider_resource_name: String,
    /// Where and how to fetch the subject identity token.
    pub url: SubjectTokenSource,
}

/// SubjectTokenSource describes an HTTP request that yields a subject identity token.
///
/// The identity token obtained in-process has a short validity window; the consuming
/// tool may run after this process exits, so the file carries fetch instructions
/// rather than the token itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectTokenSource {
    /// The URL to fetch the identity token from.
    pub url: String,
    /// Headers to send with the fetch, typically a bearer `Authorization` header.
    pub headers: HashMap<String, String>,
    /// The format of the fetch response.
    pub format_type: SubjectTokenFormat,
    /// JSON pointer locating the token value inside the fetch response.
    pub subject_cred_pointer: String,
}

/// The response format of a subject token fetch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubjectTokenFormat {
    /// The response body is a JSON document.
    Json,
}

/// OauthClientCredentials is a service principal's client id/secret pair.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OauthClientCredentials {
    /// The client id.
    pub client_id: String,
    /// The client secret.
    pub client_secret: String,
}

impl Debug for OauthClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OauthClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_workload_scheme_serialization() {
        let file = CredentialFile::Workload {
            workload: WorkloadFederation {
                provider_resource_name:
                    "iam/project/p1/service-principal/sp1/workload-identity-provider/github"
                        .to_string(),
                url: SubjectTokenSource {
                    url: "https://token.example.com/request?audience=aud".to_string(),
                    headers: HashMap::from_iter([(
                        "Authorization".to_string(),
                        "Bearer request-token".to_string(),
                    )]),
                    format_type: SubjectTokenFormat::Json,
                    subject_cred_pointer: "/value".to_string(),
                },
            },
        };

        let value: serde_json::Value =
            serde_json::from_slice(&file.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "scheme": "workload",
                "workload": {
                    "provider_resource_name":
                        "iam/project/p1/service-principal/sp1/workload-identity-provider/github",
                    "url": {
                        "url": "https://token.example.com/request?audience=aud",
                        "headers": {
                            "Authorization": "Bearer request-token"
                        },
                        "format_type": "json",
                        "subject_cred_pointer": "/value"
                    }
                }
            })
        );
    }

    #[test]
    fn test_service_principal_scheme_round_trip() {
        let file = CredentialFile::ServicePrincipalCreds {
            oauth: OauthClientCredentials {
                client_id: "my-client".to_string(),
                client_secret: "my-secret".to_string(),
            },
        };

        let encoded = file.to_json().unwrap();
        let decoded = CredentialFile::from_slice(&encoded).unwrap();
        assert_eq!(file, decoded);

        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(value["scheme"], "service_principal_creds");
        assert_eq!(value["oauth"]["client_id"], "my-client");
        assert_eq!(value["oauth"]["client_secret"], "my-secret");
    }

    #[test]
    fn test_token_debug_redacts() {
        let token = Token {
            access_token: "hvs.extremely-secret-token".to_string(),
            expires_at: None,
        };

        let printed = format!("{token:?}");
        assert!(!printed.contains("extremely-secret-token"));
    }
}
