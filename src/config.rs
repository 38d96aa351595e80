use crate::constants::{
    HCP_AUDIENCE, HCP_CLIENT_ID, HCP_CLIENT_SECRET, HCP_WORKLOAD_IDENTITY_PROVIDER,
};
use crate::utils::Redact;
use crate::Context;
use std::fmt::{self, Debug};

/// Config carries the inputs used to select and build an authentication scheme.
///
/// Exactly one scheme must be configured: either a workload identity provider resource
/// name (plus the identity token inputs) or a client id/secret pair. Supplying both or
/// neither is a configuration error, detected by
/// [`DefaultCredentialProvider::from_config`](crate::DefaultCredentialProvider::from_config)
/// before any network call.
#[derive(Clone, Default)]
pub struct Config {
    /// Resource name of the workload identity provider configured on HCP, e.g.
    /// `iam/project/p/service-principal/sp/workload-identity-provider/github`.
    pub workload_identity_provider: Option<String>,
    /// The identity token to exchange, already obtained from the ambient identity
    /// provider of the running job.
    pub identity_token: Option<String>,
    /// URL from which a downstream consumer can fetch a fresh identity token.
    pub identity_token_request_url: Option<String>,
    /// Bearer token authorizing requests against `identity_token_request_url`.
    pub identity_token_request_token: Option<String>,
    /// Audience of the identity token. Defaults to the workload identity provider
    /// resource name when unset.
    pub audience: Option<String>,
    /// Service principal client id.
    pub client_id: Option<String>,
    /// Service principal client secret.
    pub client_secret: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "workload_identity_provider",
                &self.workload_identity_provider,
            )
            .field("identity_token", &Redact::from(&self.identity_token))
            .field(
                "identity_token_request_url",
                &self.identity_token_request_url,
            )
            .field(
                "identity_token_request_token",
                &Redact::from(&self.identity_token_request_token),
            )
            .field("audience", &self.audience)
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .finish()
    }
}

impl Config {
    /// Create a new empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workload identity provider resource name.
    pub fn with_workload_identity_provider(mut self, resource_name: impl Into<String>) -> Self {
        self.workload_identity_provider = Some(resource_name.into());
        self
    }

    /// Set the identity token to exchange.
    pub fn with_identity_token(mut self, token: impl Into<String>) -> Self {
        self.identity_token = Some(token.into());
        self
    }

    /// Set the URL a consumer can re-fetch the identity token from.
    pub fn with_identity_token_request_url(mut self, url: impl Into<String>) -> Self {
        self.identity_token_request_url = Some(url.into());
        self
    }

    /// Set the bearer token authorizing the identity token re-fetch.
    pub fn with_identity_token_request_token(mut self, token: impl Into<String>) -> Self {
        self.identity_token_request_token = Some(token.into());
        self
    }

    /// Set the audience of the identity token.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the service principal client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the service principal client secret.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = ctx.env_var(HCP_WORKLOAD_IDENTITY_PROVIDER) {
            cfg.workload_identity_provider = Some(v);
        }

        if let Some(v) = ctx.env_var(HCP_AUDIENCE) {
            cfg.audience = Some(v);
        }

        if let Some(v) = ctx.env_var(HCP_CLIENT_ID) {
            cfg.client_id = Some(v);
        }

        if let Some(v) = ctx.env_var(HCP_CLIENT_SECRET) {
            cfg.client_secret = Some(v);
        }

        cfg
    }
}
