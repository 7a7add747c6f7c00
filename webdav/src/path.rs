// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Logical path handling: normalization, URL encoding and href decoding.
//!
//! Paths are held decoded and absolute; percent-encoding happens only at the
//! URL boundary, one segment at a time.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::FilesError;

/// Everything outside the RFC 3986 unreserved set gets escaped. Notably this
/// covers `+`, which some servers would otherwise read as an encoded space.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Normalizes a logical path: absolute, duplicate separators collapsed, no
/// trailing separator. The filesystem root stays `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::from("/");
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        normalized.push_str(segment);
        normalized.push('/');
    }
    if normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

/// Percent-encodes a logical path for use in a URL or `Destination` header.
///
/// Each segment is encoded independently; the separator never is, and a
/// trailing separator survives the trip.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Decodes a multistatus `href` back into a logical path.
///
/// The root prefix (the WebDAV mount, e.g. `/remote.php/webdav`) is stripped
/// at its first occurrence, since hrefs may lead with an installation prefix
/// such as `/core`. The remainder is percent-decoded and normalized.
///
/// # Errors
///
/// Fails when the decoded bytes are not valid UTF-8.
pub fn decode_href(href: &str, root_prefix: &str) -> Result<String, FilesError> {
    let tail = href.find(root_prefix).map_or(href, |idx| {
        let (_, rest) = href.split_at(idx + root_prefix.len());
        rest
    });
    let decoded =
        percent_decode_str(tail)
            .decode_utf8()
            .map_err(|e| FilesError::MalformedResponse {
                message: format!("invalid percent-encoding in href {href}: {e}"),
            })?;
    Ok(normalize_path(&decoded))
}

/// Number of levels `path` sits below `base`, or `None` when `path` is not
/// under `base`. The base itself is depth `0`.
#[must_use]
pub fn relative_depth(base: &str, path: &str) -> Option<u32> {
    let base = normalize_path(base);
    let path = normalize_path(path);
    if path == base {
        return Some(0);
    }
    let tail = if base == "/" {
        path.strip_prefix('/')
    } else {
        let prefixed = format!("{base}/");
        path.strip_prefix(prefixed.as_str())
    }?;
    u32::try_from(tail.split('/').filter(|segment| !segment.is_empty()).count()).ok()
}
