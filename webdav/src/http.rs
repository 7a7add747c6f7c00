// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP transport wrapper with authentication handling.

use reqwest::{Client, Method, RequestBuilder, Response};

use crate::config::{AuthMethod, FilesConfig};
use crate::error::FilesError;

/// Content type sent with every XML-bearing WebDAV request.
pub(crate) const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// HTTP client for WebDAV operations.
#[derive(Debug)]
pub(crate) struct HttpClient {
    client: Client,
    config: FilesConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: FilesConfig) -> Result<Self, FilesError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a request with authentication headers.
    pub fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut req = self.client.request(method, url);

        match &self.config.auth {
            AuthMethod::Basic { username, password } => {
                req = req.basic_auth(username, Some(password));
            }
            AuthMethod::Bearer { token } => {
                req = req.bearer_auth(token);
            }
            AuthMethod::None => {}
        }

        req
    }

    /// Executes a request. Only network-level failures error here; HTTP
    /// error statuses pass through for the caller to translate exactly once.
    ///
    /// # Errors
    ///
    /// Returns a [`FilesError::Transport`] when the exchange itself fails.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, FilesError> {
        let resp = req.send().await?;
        tracing::trace!(status = %resp.status(), "response received");
        Ok(resp)
    }
}

/// `WebDAV` verbs are extension methods unknown to [`reqwest::Method`].
pub(crate) fn dav_method(name: &str) -> Result<Method, FilesError> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| FilesError::Transport(format!("invalid HTTP method {name}: {e}")))
}
