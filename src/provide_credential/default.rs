use async_trait::async_trait;
use log::debug;

use crate::config::Config;
use crate::credential::Token;
use crate::{Context, Error, ProvideCredential, Result};

use super::{ServicePrincipalCredentialProvider, WorkloadIdentityCredentialProvider};

/// DefaultCredentialProvider selects exactly one authentication scheme from
/// configuration.
///
/// The two schemes are mutually exclusive: supplying both a workload identity
/// provider and client credentials, or neither, fails with
/// [`ErrorKind::ConfigInvalid`](crate::ErrorKind::ConfigInvalid) before any network
/// call is attempted.
#[derive(Debug)]
pub enum DefaultCredentialProvider {
    /// Workload identity federation was configured.
    WorkloadIdentity(WorkloadIdentityCredentialProvider),
    /// Service principal credentials were configured.
    ServicePrincipal(ServicePrincipalCredentialProvider),
}

impl DefaultCredentialProvider {
    /// Build the provider the config selects.
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(provider) = &config.workload_identity_provider {
            if config.client_id.is_some() || config.client_secret.is_some() {
                return Err(Error::config_invalid(
                    "exactly one of `workload_identity_provider` or `client_id` and \
                     `client_secret` must be configured, not both",
                ));
            }

            let identity_token = config.identity_token.clone().ok_or_else(|| {
                Error::config_invalid("workload identity federation requires an identity token")
            })?;
            let request_url = config.identity_token_request_url.clone().ok_or_else(|| {
                Error::config_invalid(
                    "workload identity federation requires an identity token request url",
                )
            })?;
            let request_token = config.identity_token_request_token.clone().ok_or_else(|| {
                Error::config_invalid(
                    "workload identity federation requires an identity token request token",
                )
            })?;
            // The audience falls back to the provider resource name.
            let audience = config
                .audience
                .clone()
                .unwrap_or_else(|| provider.clone());

            debug!("selected workload identity federation");
            return Ok(Self::WorkloadIdentity(
                WorkloadIdentityCredentialProvider::new(
                    provider,
                    identity_token,
                    request_url,
                    request_token,
                    audience,
                ),
            ));
        }

        match (config.client_id.clone(), config.client_secret.clone()) {
            (Some(client_id), Some(client_secret)) => {
                debug!("selected service principal credentials");
                Ok(Self::ServicePrincipal(
                    ServicePrincipalCredentialProvider::new(client_id, client_secret),
                ))
            }
            _ => Err(Error::config_invalid(
                "exactly one of `workload_identity_provider` or `client_id` and \
                 `client_secret` must be configured",
            )),
        }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    async fn provide_token(&self, ctx: &Context) -> Result<Token> {
        match self {
            Self::WorkloadIdentity(provider) => provider.provide_token(ctx).await,
            Self::ServicePrincipal(provider) => provider.provide_token(ctx).await,
        }
    }

    async fn write_credential_file(&self, ctx: &Context, path: &str) -> Result<String> {
        match self {
            Self::WorkloadIdentity(provider) => provider.write_credential_file(ctx, path).await,
            Self::ServicePrincipal(provider) => provider.write_credential_file(ctx, path).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn workload_config() -> Config {
        Config::new()
            .with_workload_identity_provider("iam/project/p1/workload-identity-provider/github")
            .with_identity_token("header.payload.signature")
            .with_identity_token_request_url("https://token.example.com/request")
            .with_identity_token_request_token("request-token")
    }

    #[test]
    fn test_selects_workload_identity() {
        let provider = DefaultCredentialProvider::from_config(&workload_config()).unwrap();
        assert!(matches!(
            provider,
            DefaultCredentialProvider::WorkloadIdentity(_)
        ));
    }

    #[test]
    fn test_selects_service_principal() {
        let config = Config::new()
            .with_client_id("my-client")
            .with_client_secret("my-secret");

        let provider = DefaultCredentialProvider::from_config(&config).unwrap();
        assert!(matches!(
            provider,
            DefaultCredentialProvider::ServicePrincipal(_)
        ));
    }

    #[test]
    fn test_rejects_both_schemes() {
        let config = workload_config().with_client_id("my-client");

        let err = DefaultCredentialProvider::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_rejects_no_scheme() {
        let err = DefaultCredentialProvider::from_config(&Config::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_rejects_partial_service_principal() {
        let config = Config::new().with_client_id("my-client");

        let err = DefaultCredentialProvider::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_rejects_workload_without_identity_token() {
        let config = Config::new()
            .with_workload_identity_provider("iam/project/p1/workload-identity-provider/github");

        let err = DefaultCredentialProvider::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
