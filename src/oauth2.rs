//! Shared plumbing for the HCP exchange and identity endpoints.
//!
//! Both credential providers and the caller-identity lookup follow the same pattern:
//! build a request, send it through the [`Context`], reject non-2xx responses, and
//! decode the JSON body. The helpers here keep that pattern in one place.

use bytes::Bytes;
use chrono::Utc;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::Method;
use log::error;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::credential::Token;
use crate::{Context, Error, Result};

/// Token response returned by both HCP exchange endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    /// The access token issued by the endpoint. Defaults to empty so that a 2xx
    /// response without the field is reported as malformed rather than undecodable.
    #[serde(default)]
    pub access_token: String,

    /// The lifetime in seconds of the access token, when reported.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Send a POST request and decode the JSON response.
///
/// Transport failures and non-2xx statuses fail with
/// [`ErrorKind::ExchangeFailed`](crate::ErrorKind::ExchangeFailed); a 2xx response
/// that cannot be decoded fails with
/// [`ErrorKind::MalformedResponse`](crate::ErrorKind::MalformedResponse).
pub(crate) async fn post<R: DeserializeOwned>(
    ctx: &Context,
    url: &str,
    content_type: &str,
    headers: &[(&str, &str)],
    body: Vec<u8>,
) -> Result<R> {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(url)
        .header(ACCEPT, "application/json")
        .header(CONTENT_TYPE, content_type);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder
        .body(Bytes::from(body))
        .map_err(|e| Error::unexpected("failed to build HTTP request").with_source(e))?;

    let resp = ctx
        .http_send(req)
        .await
        .map_err(|e| Error::exchange_failed(format!("failed to call {url}")).with_source(e))?;

    decode_response(url, resp)
}

/// Send a GET request and decode the JSON response.
///
/// Error classification matches [`post`].
pub(crate) async fn get<R: DeserializeOwned>(
    ctx: &Context,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<R> {
    let mut builder = http::Request::builder()
        .method(Method::GET)
        .uri(url)
        .header(ACCEPT, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder
        .body(Bytes::new())
        .map_err(|e| Error::unexpected("failed to build HTTP request").with_source(e))?;

    let resp = ctx
        .http_send(req)
        .await
        .map_err(|e| Error::exchange_failed(format!("failed to call {url}")).with_source(e))?;

    decode_response(url, resp)
}

fn decode_response<R: DeserializeOwned>(url: &str, resp: http::Response<Bytes>) -> Result<R> {
    let status = resp.status();
    if !status.is_success() {
        error!("request to {url} returned unexpected status: {status}");
        return Err(Error::exchange_failed(format!(
            "failed to call {url}: HTTP {status}: {}",
            body_for_message(resp.body())
        )));
    }

    serde_json::from_slice(resp.body()).map_err(|e| {
        Error::malformed_response(format!(
            "successfully called {url}, but the response body could not be decoded"
        ))
        .with_source(e)
    })
}

fn body_for_message(body: &Bytes) -> String {
    if body.is_empty() {
        "[no body]".to_string()
    } else {
        String::from_utf8_lossy(body).to_string()
    }
}

/// Convert a token response into a [`Token`], stamping the expiry when reported.
pub(crate) fn token_from_response(resp: TokenResponse) -> Token {
    let expires_at = resp.expires_in.map(|expires_in| {
        Utc::now() + chrono::TimeDelta::try_seconds(expires_in as i64).expect("in bounds")
    });

    Token {
        access_token: resp.access_token,
        expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_decode_response_rejects_non_2xx() {
        let resp = http::Response::builder()
            .status(StatusCode::FORBIDDEN)
            .body(Bytes::from_static(b"no access"))
            .unwrap();

        let err = decode_response::<TokenResponse>("https://example.com/token", resp).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ExchangeFailed);
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("no access"));
    }

    #[test]
    fn test_decode_response_accepts_any_2xx() {
        let resp = http::Response::builder()
            .status(StatusCode::CREATED)
            .body(Bytes::from_static(b"{\"access_token\":\"tok\"}"))
            .unwrap();

        let decoded: TokenResponse =
            decode_response("https://example.com/token", resp).unwrap();
        assert_eq!(decoded.access_token, "tok");
    }

    #[test]
    fn test_token_from_response_without_expiry() {
        let token = token_from_response(TokenResponse {
            access_token: "tok".to_string(),
            expires_in: None,
        });
        assert_eq!(token.access_token, "tok");
        assert!(token.expires_at.is_none());
    }
}
