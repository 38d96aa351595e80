//! Caller identity lookup against the HCP IAM service.

use http::header::AUTHORIZATION;
use log::debug;
use serde::Deserialize;

use crate::constants::{CALLER_IDENTITY_URL, DEFAULT_SOURCE_CHANNEL, SOURCE_CHANNEL};
use crate::credential::Token;
use crate::oauth2;
use crate::{Context, Error, Result};

/// PrincipalDetails contains the organization and project scope of the
/// authenticated principal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrincipalDetails {
    /// The organization the principal belongs to. Always present.
    pub organization_id: String,
    /// The project the principal is scoped to. Absent for org-scoped principals.
    pub project_id: Option<String>,
}

/// Response of the CallerIdentity API.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CallerIdentityResponse {
    principal: Principal,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Principal {
    service: ServicePrincipal,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ServicePrincipal {
    id: String,
    organization_id: String,
    project_id: String,
}

/// CallerIdentityClient resolves an access token into the principal it
/// authenticates.
#[derive(Clone, Debug)]
pub struct CallerIdentityClient {
    source_channel: String,
}

impl Default for CallerIdentityClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CallerIdentityClient {
    /// Create a new CallerIdentityClient.
    pub fn new() -> Self {
        Self {
            source_channel: DEFAULT_SOURCE_CHANNEL.to_string(),
        }
    }

    /// Override the source channel reported to HCP.
    pub fn with_source_channel(mut self, source_channel: impl Into<String>) -> Self {
        self.source_channel = source_channel.into();
        self
    }

    /// Retrieve details about the principal the given token authenticates.
    ///
    /// Fails with [`ErrorKind::ExchangeFailed`](crate::ErrorKind::ExchangeFailed) on a
    /// transport error or non-2xx status, and with
    /// [`ErrorKind::MalformedResponse`](crate::ErrorKind::MalformedResponse) when the
    /// response lacks the service principal's id or organization id. A
    /// present-but-empty project id is reported as `None`.
    pub async fn caller_identity(&self, ctx: &Context, token: &Token) -> Result<PrincipalDetails> {
        debug!("resolving caller identity");

        let bearer = format!("Bearer {}", token.access_token);
        let resp: CallerIdentityResponse = oauth2::get(
            ctx,
            CALLER_IDENTITY_URL,
            &[
                (AUTHORIZATION.as_str(), bearer.as_str()),
                (SOURCE_CHANNEL, self.source_channel.as_str()),
            ],
        )
        .await?;

        let service = resp.principal.service;
        if service.id.is_empty() || service.organization_id.is_empty() {
            return Err(Error::malformed_response(format!(
                "successfully called {CALLER_IDENTITY_URL}, but the result contained unexpected values"
            )));
        }

        let project_id = if service.project_id.is_empty() {
            None
        } else {
            Some(service.project_id)
        };

        Ok(PrincipalDetails {
            organization_id: service.organization_id,
            project_id,
        })
    }
}
