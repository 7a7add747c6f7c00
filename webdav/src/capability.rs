// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Detection of the TUS resumable-upload advertisement in response headers.

use reqwest::header::HeaderMap;

use crate::types::FileInfo;

/// Resumable-upload support advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TusCapability {
    /// Protocol version the server resumes with (`Tus-Resumable`).
    pub resumable: String,
    /// Protocol versions the server offers (`Tus-Version`).
    pub version: Vec<String>,
    /// Supported protocol extensions (`Tus-Extension`).
    pub extension: Vec<String>,
    /// Upload size ceiling; absent when the header is missing or not
    /// numeric.
    pub max_size: Option<u64>,
}

/// Inspects response headers for a TUS advertisement.
///
/// `Tus-Resumable` is required; without it there is no capability. Version
/// and extension lists are comma-separated and trimmed. An unparseable
/// `Tus-Max-Size` clears only that field, not the whole capability.
#[must_use]
pub fn detect_tus_support(headers: &HeaderMap) -> Option<TusCapability> {
    let resumable = header_str(headers, "Tus-Resumable")?.to_string();
    let version = header_str(headers, "Tus-Version")
        .map(split_list)
        .unwrap_or_default();
    let extension = header_str(headers, "Tus-Extension")
        .map(split_list)
        .unwrap_or_default();
    let max_size =
        header_str(headers, "Tus-Max-Size").and_then(|value| value.trim().parse().ok());
    Some(TusCapability {
        resumable,
        version,
        extension,
        max_size,
    })
}

/// Attaches a detected capability to the first descriptor only.
///
/// The advertisement belongs to the response, not to each listed resource,
/// so it is never broadcast across a multi-entry listing.
pub fn attach_tus_support(headers: &HeaderMap, entries: &mut [FileInfo]) {
    if let Some(capability) = detect_tus_support(headers) {
        if let Some(first) = entries.first_mut() {
            first.set_tus_support(capability);
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
