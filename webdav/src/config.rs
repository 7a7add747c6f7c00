// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

/// Authentication method presented to the server.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(tag = "type")]
pub enum AuthMethod {
    /// No authentication.
    #[serde(rename = "none")]
    #[default]
    None,
    /// Basic authentication (username/password).
    #[serde(rename = "basic")]
    Basic {
        /// Username for authentication.
        username: String,
        /// Password for authentication.
        password: String,
    },
    /// Bearer token authentication (OAuth).
    #[serde(rename = "bearer")]
    Bearer {
        /// Bearer token.
        token: String,
    },
}

/// Connection settings for an ownCloud-compatible server.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FilesConfig {
    /// Server origin, e.g. `https://cloud.example.com`.
    pub base_url: String,
    /// Account whose file tree the `dav/files` endpoints address.
    pub username: String,
    /// Authentication method.
    #[serde(default)]
    pub auth: AuthMethod,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("ocfiles-webdav/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            auth: AuthMethod::default(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
