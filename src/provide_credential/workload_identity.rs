use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use url::Url;

use crate::constants::{
    CREDENTIAL_FILE_MODE, DEFAULT_SOURCE_CHANNEL, SOURCE_CHANNEL, TOKEN_EXCHANGE_BASE,
};
use crate::credential::{
    CredentialFile, SubjectTokenFormat, SubjectTokenSource, Token, WorkloadFederation,
};
use crate::oauth2::{self, TokenResponse};
use crate::utils::Redact;
use crate::{Context, Error, ProvideCredential, Result};

/// Exchange request sent to the workload identity provider endpoint.
#[derive(Serialize)]
struct ExchangeTokenRequest<'a> {
    jwt_token: &'a str,
}

/// WorkloadIdentityCredentialProvider exchanges a workload's identity token for an
/// HCP access token, without any long-lived secret.
///
/// The credential file it writes does not carry the identity token: the token has a
/// short validity window and the consuming tool may run after this process exits.
/// Instead the file embeds the URL and bearer header with which a consumer can fetch
/// a fresh identity token on its own.
#[derive(Clone)]
pub struct WorkloadIdentityCredentialProvider {
    provider_resource_name: String,
    identity_token: String,
    token_request_url: String,
    token_request_token: String,
    audience: String,
    source_channel: String,
}

impl Debug for WorkloadIdentityCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadIdentityCredentialProvider")
            .field("provider_resource_name", &self.provider_resource_name)
            .field("identity_token", &Redact::from(&self.identity_token))
            .field("token_request_url", &self.token_request_url)
            .field("token_request_token", &Redact::from(&self.token_request_token))
            .field("audience", &self.audience)
            .field("source_channel", &self.source_channel)
            .finish()
    }
}

impl WorkloadIdentityCredentialProvider {
    /// Create a new WorkloadIdentityCredentialProvider.
    ///
    /// `identity_token` is the token to exchange, already obtained from the ambient
    /// identity provider; `token_request_url` and `token_request_token` are the
    /// coordinates a consumer can re-fetch a fresh token from; `audience` is the
    /// audience the token was issued for.
    pub fn new(
        provider_resource_name: impl Into<String>,
        identity_token: impl Into<String>,
        token_request_url: impl Into<String>,
        token_request_token: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            provider_resource_name: provider_resource_name.into(),
            identity_token: identity_token.into(),
            token_request_url: token_request_url.into(),
            token_request_token: token_request_token.into(),
            audience: audience.into(),
            source_channel: DEFAULT_SOURCE_CHANNEL.to_string(),
        }
    }

    /// Override the source channel reported to HCP.
    pub fn with_source_channel(mut self, source_channel: impl Into<String>) -> Self {
        self.source_channel = source_channel.into();
        self
    }

    /// Build the URL a consumer fetches a fresh identity token from: the request URL
    /// with the audience appended as a query parameter.
    fn subject_token_url(&self) -> Result<Url> {
        let mut request_url = Url::parse(&self.token_request_url).map_err(|e| {
            Error::config_invalid(format!(
                "invalid identity token request url: {}",
                self.token_request_url
            ))
            .with_source(e)
        })?;

        let pairs: Vec<(String, String)> = request_url
            .query_pairs()
            .filter(|(k, _)| k != "audience")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        {
            let mut query = request_url.query_pairs_mut();
            query.clear();
            for (k, v) in &pairs {
                query.append_pair(k, v);
            }
            query.append_pair("audience", &self.audience);
        }

        Ok(request_url)
    }
}

#[async_trait]
impl ProvideCredential for WorkloadIdentityCredentialProvider {
    async fn provide_token(&self, ctx: &Context) -> Result<Token> {
        let url = format!(
            "{TOKEN_EXCHANGE_BASE}/{}/exchange-token",
            self.provider_resource_name
        );
        debug!("exchanging workload identity token at {url}");

        let body = serde_json::to_vec(&ExchangeTokenRequest {
            jwt_token: &self.identity_token,
        })
        .map_err(|e| Error::unexpected("failed to serialize exchange request").with_source(e))?;

        let resp: TokenResponse = oauth2::post(
            ctx,
            &url,
            "application/json",
            &[(SOURCE_CHANNEL, self.source_channel.as_str())],
            body,
        )
        .await?;

        if resp.access_token.is_empty() {
            return Err(Error::malformed_response(format!(
                "successfully called {url}, but the result didn't contain an access_token"
            )));
        }

        Ok(oauth2::token_from_response(resp))
    }

    async fn write_credential_file(&self, ctx: &Context, path: &str) -> Result<String> {
        let request_url = self.subject_token_url()?;

        let file = CredentialFile::Workload {
            workload: WorkloadFederation {
                provider_resource_name: self.provider_resource_name.clone(),
                url: SubjectTokenSource {
                    url: request_url.to_string(),
                    headers: HashMap::from_iter([(
                        "Authorization".to_string(),
                        format!("Bearer {}", self.token_request_token),
                    )]),
                    format_type: SubjectTokenFormat::Json,
                    subject_cred_pointer: "/value".to_string(),
                },
            },
        };

        let content = file.to_json()?;
        ctx.file_create_new(path, &content, CREDENTIAL_FILE_MODE)
            .await?;

        debug!("wrote workload identity credential file to {path}");
        Ok(path.to_string())
    }
}
