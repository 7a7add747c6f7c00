// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! WebDAV file-management client for ownCloud-compatible servers.
//!
//! The crate wraps the files endpoints (`remote.php/webdav`,
//! `remote.php/dav/...`) behind a typed client: folder listings with depth
//! control, up/downloads, move/copy, favorites, system tags, file name
//! search, and file-id path resolution. Multistatus responses are parsed
//! into [`FileInfo`] descriptors keyed by (namespace, local-name) property
//! pairs, and failures are mapped onto the [`FilesError`] taxonomy.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod capability;
mod client;
mod config;
mod error;
mod http;
mod path;
mod request;
mod response;
mod types;
mod xml;

pub use crate::capability::{TusCapability, attach_tus_support, detect_tus_support};
pub use crate::client::FilesClient;
pub use crate::config::{AuthMethod, FilesConfig};
pub use crate::error::FilesError;
pub use crate::path::{decode_href, encode_path, normalize_path, relative_depth};
pub use crate::request::{
    FilterFilesRequest, FilterRule, PropFindRequest, PropPatchRequest, SearchRequest,
};
pub use crate::response::{MultiStatus, PropStat, ResponseUnit};
pub use crate::types::{Depth, FileInfo, PropertyName, TagHandle};
