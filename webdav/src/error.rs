// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The error taxonomy and the HTTP/WebDAV failure translator.

use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use reqwest::{Response, StatusCode};

use crate::xml::ns;

/// Errors produced by the files client.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The addressed resource does not exist on the server.
    #[error("File with name {path} could not be located")]
    NotFound {
        /// Path or identifier exactly as the caller supplied it.
        path: String,
    },

    /// The server refused the operation.
    #[error("{message}")]
    Forbidden {
        /// Server exception message, or a status-derived fallback.
        message: String,
    },

    /// The operation conflicts with the current server-side state.
    #[error("{message}")]
    Conflict {
        /// Server exception message, or a status-derived fallback.
        message: String,
    },

    /// The server answered with a body the client could not interpret.
    #[error("malformed server response: {message}")]
    MalformedResponse {
        /// What failed to parse.
        message: String,
    },

    /// A network-level failure; no HTTP status was received.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Any other unmapped HTTP error status.
    #[error("request failed with status {status}: {message}")]
    RequestFailed {
        /// Raw HTTP status code.
        status: u16,
        /// Best-effort message.
        message: String,
    },
}

impl FilesError {
    /// Translates an HTTP error status plus optional WebDAV exception body
    /// into the taxonomy.
    ///
    /// `NotFound` always renders the caller-supplied path, never the
    /// server's own formatting; `Forbidden` and `Conflict` prefer the
    /// `<s:message>` element of a sabre exception body when one is present.
    #[must_use]
    pub fn from_http_response(status: StatusCode, body: Option<&str>, requested: &str) -> Self {
        let server_message = body.and_then(exception_message);
        match status {
            StatusCode::NOT_FOUND => Self::NotFound {
                path: requested.to_string(),
            },
            StatusCode::FORBIDDEN => Self::Forbidden {
                message: server_message
                    .unwrap_or_else(|| format!("access to {requested} is forbidden")),
            },
            StatusCode::CONFLICT => Self::Conflict {
                message: server_message
                    .unwrap_or_else(|| format!("conflicting state for {requested}")),
            },
            _ => Self::RequestFailed {
                status: status.as_u16(),
                message: server_message.unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unrecognized status")
                        .to_string()
                }),
            },
        }
    }
}

impl From<reqwest::Error> for FilesError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<quick_xml::Error> for FilesError {
    fn from(e: quick_xml::Error) -> Self {
        Self::MalformedResponse {
            message: e.to_string(),
        }
    }
}

impl From<quick_xml::encoding::EncodingError> for FilesError {
    fn from(e: quick_xml::encoding::EncodingError) -> Self {
        Self::MalformedResponse {
            message: e.to_string(),
        }
    }
}

impl From<quick_xml::escape::EscapeError> for FilesError {
    fn from(e: quick_xml::escape::EscapeError) -> Self {
        Self::MalformedResponse {
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for FilesError {
    fn from(e: std::io::Error) -> Self {
        Self::Transport(format!("I/O error: {e}"))
    }
}

/// Passes successful responses through and translates everything else,
/// consuming the body for its exception message. This is the single point
/// where HTTP failures become [`FilesError`] values.
pub(crate) async fn ensure_success(
    resp: Response,
    requested: &str,
) -> Result<Response, FilesError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    tracing::debug!(%status, requested, "translating error response");
    let body = resp.text().await.unwrap_or_default();
    let body = (!body.is_empty()).then_some(body);
    Err(FilesError::from_http_response(
        status,
        body.as_deref(),
        requested,
    ))
}

/// Extracts the `<s:message>` content of a sabre exception body.
fn exception_message(body: &str) -> Option<String> {
    let mut reader = NsReader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut in_message = false;
    loop {
        match reader.read_resolved_event() {
            Ok((ResolveResult::Bound(namespace), Event::Start(element))) => {
                if namespace.as_ref() == ns::SABRE.as_bytes()
                    && element.local_name().as_ref() == b"message"
                {
                    in_message = true;
                }
            }
            Ok((_, Event::Text(text))) if in_message => {
                return text
                    .decode()
                    .ok()
                    .and_then(|decoded| unescape(&decoded).ok().map(|m| m.into_owned()));
            }
            Ok((_, Event::End(_))) if in_message => in_message = false,
            Ok((_, Event::Eof)) | Err(_) => return None,
            _ => {}
        }
    }
}
