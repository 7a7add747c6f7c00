// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! XML namespaces shared by the request builders and response parsers.

/// Namespaces used by ownCloud-compatible WebDAV endpoints.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// ownCloud vendor namespace.
    pub const OWNCLOUD: &str = "http://owncloud.org/ns";

    /// `SabreDAV` namespace carried by server exception bodies.
    pub const SABRE: &str = "http://sabredav.org/ns";
}
