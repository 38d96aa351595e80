// Env values used to configure HCP authentication.
pub const HCP_WORKLOAD_IDENTITY_PROVIDER: &str = "HCP_WORKLOAD_IDENTITY_PROVIDER";
pub const HCP_AUDIENCE: &str = "HCP_AUDIENCE";
pub const HCP_CLIENT_ID: &str = "HCP_CLIENT_ID";
pub const HCP_CLIENT_SECRET: &str = "HCP_CLIENT_SECRET";

// Base URL of the token exchange API for workload identity providers.
pub const TOKEN_EXCHANGE_BASE: &str = "https://api.cloud.hashicorp.com/2019-12-10";

// OAuth token endpoint used by the client credentials grant.
pub const OAUTH_TOKEN_URL: &str = "https://auth.idp.hashicorp.com/oauth/token";

// Fixed audience of the client credentials grant.
pub const OAUTH_AUDIENCE: &str = "https://api.hashicorp.cloud";

// Caller identity endpoint of the IAM service.
pub const CALLER_IDENTITY_URL: &str = "https://api.cloud.hashicorp.com/iam/2019-12-10/caller-identity";

// SOURCE_CHANNEL is the header that identifies the source of the request.
pub const SOURCE_CHANNEL: &str = "X-HCP-Source-Channel";

// Default source channel value, `<crate>/<version>`.
pub const DEFAULT_SOURCE_CHANNEL: &str = concat!("hcp-auth/", env!("CARGO_PKG_VERSION"));

// Permission mode applied to the credential file. Owner read/write, group read.
pub const CREDENTIAL_FILE_MODE: u32 = 0o640;
