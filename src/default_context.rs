use crate::{Env, Error, FileWrite, HttpSend, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::collections::HashMap;
use tokio::io::AsyncWriteExt;

/// DefaultContext implements every [`Context`](crate::Context) component with the
/// process environment, tokio's file system, and a shared reqwest client.
///
/// The reqwest client follows redirects (bounded by its default policy) and reuses
/// connections; callers that need a tuned transport can inject their own client via
/// [`DefaultContext::with_client`].
///
/// ## Example
///
/// ```
/// use hcp_auth::{Context, DefaultContext};
///
/// let dc = DefaultContext::new();
/// let ctx = Context::new()
///     .with_http_send(dc.clone())
///     .with_file_write(dc.clone())
///     .with_env(dc);
/// ```
#[derive(Debug, Default, Clone)]
pub struct DefaultContext {
    client: Client,
}

impl DefaultContext {
    /// Create a new DefaultContext with a default reqwest client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a DefaultContext that sends requests through the given client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for DefaultContext {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        // Convert http::Request to reqwest::Request
        let method = req.method().clone();
        let uri = req.uri().to_string();
        let headers = req.headers().clone();
        let body = req.into_body();

        let resp = self
            .client
            .request(method, uri)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::unexpected("failed to send HTTP request").with_source(e))?;

        // Convert reqwest::Response to http::Response
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::unexpected("failed to read HTTP response body").with_source(e))?;

        let mut builder = http::Response::builder().status(status);
        for (name, value) in headers {
            if let Some(name) = name {
                builder = builder.header(name, value);
            }
        }

        Ok(builder.body(body)?)
    }
}

#[async_trait]
impl FileWrite for DefaultContext {
    async fn file_create_new(&self, path: &str, content: &[u8], mode: u32) -> Result<()> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = match options.open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(
                    Error::file_exists(format!("file already exists at {path}")).with_source(e)
                );
            }
            Err(e) => {
                return Err(
                    Error::unexpected(format!("failed to create file at {path}")).with_source(e)
                );
            }
        };

        file.write_all(content)
            .await
            .map_err(|e| Error::unexpected(format!("failed to write file at {path}")).with_source(e))?;
        file.sync_all()
            .await
            .map_err(|e| Error::unexpected(format!("failed to flush file at {path}")).with_source(e))?;

        Ok(())
    }
}

impl Env for DefaultContext {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn vars(&self) -> HashMap<String, String> {
        std::env::vars().collect()
    }
}
