use std::fmt::{self, Debug, Formatter};

use async_trait::async_trait;
use log::debug;

use crate::constants::{CREDENTIAL_FILE_MODE, OAUTH_AUDIENCE, OAUTH_TOKEN_URL};
use crate::credential::{CredentialFile, OauthClientCredentials, Token};
use crate::oauth2::{self, TokenResponse};
use crate::utils::Redact;
use crate::{Context, Error, ProvideCredential, Result};

/// ServicePrincipalCredentialProvider exchanges a service principal's client
/// credentials for an HCP access token via the OAuth client credentials grant.
///
/// Unlike the workload identity scheme there is no re-derivable token source, so the
/// credential file carries the client id/secret pair itself; its lifecycle is
/// security sensitive.
#[derive(Clone)]
pub struct ServicePrincipalCredentialProvider {
    client_id: String,
    client_secret: String,
}

impl Debug for ServicePrincipalCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipalCredentialProvider")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .finish()
    }
}

impl ServicePrincipalCredentialProvider {
    /// Create a new ServicePrincipalCredentialProvider.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait]
impl ProvideCredential for ServicePrincipalCredentialProvider {
    async fn provide_token(&self, ctx: &Context) -> Result<Token> {
        debug!("exchanging service principal credentials at {OAUTH_TOKEN_URL}");

        let body = {
            let mut form = form_urlencoded::Serializer::new(String::new());
            form.append_pair("grant_type", "client_credentials")
                .append_pair("client_id", &self.client_id)
                .append_pair("client_secret", &self.client_secret)
                .append_pair("audience", OAUTH_AUDIENCE);
            form.finish().into_bytes()
        };

        let resp: TokenResponse = oauth2::post(
            ctx,
            OAUTH_TOKEN_URL,
            "application/x-www-form-urlencoded",
            &[],
            body,
        )
        .await?;

        if resp.access_token.is_empty() {
            return Err(Error::malformed_response(format!(
                "successfully called {OAUTH_TOKEN_URL}, but the result didn't contain an access_token"
            )));
        }

        Ok(oauth2::token_from_response(resp))
    }

    async fn write_credential_file(&self, ctx: &Context, path: &str) -> Result<String> {
        let file = CredentialFile::ServicePrincipalCreds {
            oauth: OauthClientCredentials {
                client_id: self.client_id.clone(),
                client_secret: self.client_secret.clone(),
            },
        };

        let content = file.to_json()?;
        ctx.file_create_new(path, &content, CREDENTIAL_FILE_MODE)
            .await?;

        debug!("wrote service principal credential file to {path}");
        Ok(path.to_string())
    }
}
