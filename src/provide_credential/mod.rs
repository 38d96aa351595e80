use std::fmt::Debug;

use crate::credential::Token;
use crate::{Context, Result};

mod default;
pub use default::DefaultCredentialProvider;

mod service_principal;
pub use service_principal::ServicePrincipalCredentialProvider;

mod workload_identity;
pub use workload_identity::WorkloadIdentityCredentialProvider;

/// ProvideCredential is the contract implemented by every HCP authentication scheme.
///
/// A provider is immutable once constructed and holds only the inputs its scheme
/// needs. Each run drives the sequence: write the credential file, exchange for an
/// access token, then resolve the caller identity via
/// [`CallerIdentityClient`](crate::CallerIdentityClient).
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Exchange the held inputs for an HCP access token.
    ///
    /// Performs exactly one network exchange; any retries are the transport's concern.
    async fn provide_token(&self, ctx: &Context) -> Result<Token>;

    /// Write a credential file consumable by other HCP tooling.
    ///
    /// The file is created with exclusive-create semantics and restricted permissions;
    /// an occupied path fails with
    /// [`ErrorKind::FileExists`](crate::ErrorKind::FileExists). Returns the path for
    /// chaining. Deleting the file after use is the caller's responsibility.
    async fn write_credential_file(&self, ctx: &Context, path: &str) -> Result<String>;
}
