mod common;

use common::MockHttpSend;
use hcp_auth::{Config, Context, DefaultCredentialProvider, ErrorKind, StaticEnv};
use std::collections::HashMap;

#[test]
fn test_service_principal_selected_from_env() {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from_iter([
            ("HCP_CLIENT_ID".to_string(), "my-client".to_string()),
            ("HCP_CLIENT_SECRET".to_string(), "my-secret".to_string()),
        ]),
    });

    let config = Config::from_env(&ctx);
    let provider = DefaultCredentialProvider::from_config(&config).unwrap();
    assert!(matches!(
        provider,
        DefaultCredentialProvider::ServicePrincipal(_)
    ));
}

#[test]
fn test_workload_identity_selected_from_env() {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from_iter([(
            "HCP_WORKLOAD_IDENTITY_PROVIDER".to_string(),
            "iam/project/p1/workload-identity-provider/github".to_string(),
        )]),
    });

    let config = Config::from_env(&ctx)
        .with_identity_token("header.payload.signature")
        .with_identity_token_request_url("https://token.example.com/request")
        .with_identity_token_request_token("request-token");
    let provider = DefaultCredentialProvider::from_config(&config).unwrap();
    assert!(matches!(
        provider,
        DefaultCredentialProvider::WorkloadIdentity(_)
    ));
}

#[test]
fn test_both_schemes_fail_before_any_network_call() {
    let mock = MockHttpSend::new(200, r#"{"access_token":"tok123"}"#);
    // The transport is wired up but must never be reached.
    let _ctx = Context::new().with_http_send(mock.clone());

    let config = Config::new()
        .with_workload_identity_provider("iam/project/p1/workload-identity-provider/github")
        .with_identity_token("header.payload.signature")
        .with_identity_token_request_url("https://token.example.com/request")
        .with_identity_token_request_token("request-token")
        .with_client_id("my-client")
        .with_client_secret("my-secret");

    let err = DefaultCredentialProvider::from_config(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(mock.requests().is_empty());
}

#[test]
fn test_neither_scheme_fails_before_any_network_call() {
    let mock = MockHttpSend::new(200, r#"{"access_token":"tok123"}"#);
    let _ctx = Context::new().with_http_send(mock.clone());

    let err = DefaultCredentialProvider::from_config(&Config::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(mock.requests().is_empty());
}
