//! Exchange workload identities or service principal credentials for HCP access tokens.
//!
//! This crate lets an automated job authenticate to the HashiCorp Cloud Platform
//! without holding a long-lived secret. It supports two mutually exclusive schemes:
//!
//! - **Workload identity federation**: a short-lived identity token issued by the
//!   job's ambient identity provider is exchanged against a workload identity
//!   provider configured on HCP.
//! - **Service principal credentials**: a client id/secret pair is exchanged via the
//!   OAuth client credentials grant.
//!
//! Each scheme yields an in-memory [`Token`] and writes a credential file that other
//! HCP tooling (such as the `hcp` CLI) can consume independently; the
//! [`CallerIdentityClient`] then resolves the token into the organization and project
//! it is scoped to.
//!
//! ## Example
//!
//! ```no_run
//! use hcp_auth::{
//!     CallerIdentityClient, Config, Context, DefaultContext, DefaultCredentialProvider,
//!     ProvideCredential,
//! };
//!
//! #[tokio::main]
//! async fn main() -> hcp_auth::Result<()> {
//!     let dc = DefaultContext::new();
//!     let ctx = Context::new()
//!         .with_http_send(dc.clone())
//!         .with_file_write(dc.clone())
//!         .with_env(dc);
//!
//!     // Reads HCP_WORKLOAD_IDENTITY_PROVIDER / HCP_CLIENT_ID / HCP_CLIENT_SECRET /
//!     // HCP_AUDIENCE; the identity token inputs come from the caller.
//!     let config = Config::from_env(&ctx)
//!         .with_identity_token("header.payload.signature")
//!         .with_identity_token_request_url("https://token.example.com/request")
//!         .with_identity_token_request_token("request-token");
//!     let provider = DefaultCredentialProvider::from_config(&config)?;
//!
//!     let credential_path = provider
//!         .write_credential_file(&ctx, "hcp-creds.json")
//!         .await?;
//!     let token = provider.provide_token(&ctx).await?;
//!
//!     let identity = CallerIdentityClient::new().caller_identity(&ctx, &token).await?;
//!     println!(
//!         "authenticated to organization {} (credential file at {credential_path})",
//!         identity.organization_id
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Traits
//!
//! All I/O goes through the [`Context`], which holds implementations of:
//!
//! - [`HttpSend`]: for the exchange and identity-lookup calls
//! - [`FileWrite`]: for the exclusive-create credential file write
//! - [`Env`]: for environment variable access
//!
//! [`DefaultContext`] implements all three; tests can swap in their own.

mod constants;

mod config;
pub use config::Config;

mod context;
pub use context::{Context, Env, FileWrite, HttpSend, OsEnv, StaticEnv};

#[cfg(not(target_arch = "wasm32"))]
mod default_context;
#[cfg(not(target_arch = "wasm32"))]
pub use default_context::DefaultContext;

mod credential;
pub use credential::{
    CredentialFile, OauthClientCredentials, SubjectTokenFormat, SubjectTokenSource, Token,
    WorkloadFederation,
};

mod error;
pub use error::{Error, ErrorKind, Result};

mod iam;
pub use iam::{CallerIdentityClient, PrincipalDetails};

mod oauth2;

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, ProvideCredential, ServicePrincipalCredentialProvider,
    WorkloadIdentityCredentialProvider,
};

pub mod utils;
