// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use jiff::Zoned;
use jiff::fmt::rfc2822::DateTimeParser;

use crate::capability::TusCapability;
use crate::xml::ns;

static HTTP_DATE: DateTimeParser = DateTimeParser::new();

/// `WebDAV` listing depth.
///
/// Servers reliably understand `0`, `1` and `infinity`. A numeric limit is
/// requested as `infinity` and truncated client-side by relative path depth,
/// trading some over-fetching for a single round trip on servers without
/// numeric-depth support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// The target resource only.
    Zero,
    /// The target plus its immediate children.
    One,
    /// The target plus all descendants.
    Infinity,
    /// The target plus descendants at most this many levels below it.
    Limit(u32),
}

impl Depth {
    /// Value sent in the `Depth` request header.
    #[must_use]
    pub fn header_value(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity | Self::Limit(_) => "infinity",
        }
    }

    pub(crate) fn client_limit(self) -> Option<u32> {
        match self {
            Self::Limit(limit) => Some(limit),
            _ => None,
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::One
    }
}

/// A `WebDAV` property identified by its XML namespace and local name.
///
/// Equality is by the pair. The rendered form is Clark notation, e.g.
/// `{http://owncloud.org/ns}favorite`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyName {
    namespace: String,
    name: String,
}

impl PropertyName {
    /// Creates a property name from a namespace URI and a local name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// A property in the `DAV:` namespace.
    #[must_use]
    pub fn dav(name: impl Into<String>) -> Self {
        Self::new(ns::DAV, name)
    }

    /// A property in the ownCloud vendor namespace.
    #[must_use]
    pub fn oc(name: impl Into<String>) -> Self {
        Self::new(ns::OWNCLOUD, name)
    }

    /// The namespace URI.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.name)
    }
}

/// A file or folder descriptor assembled from one multistatus response unit.
///
/// Descriptors are immutable once constructed; everything is read through
/// accessors. Properties keep response order and hold raw string values; a
/// property the server reported only under a non-success status is absent,
/// not empty.
#[derive(Debug, Clone)]
pub struct FileInfo {
    path: String,
    is_collection: bool,
    properties: Vec<(PropertyName, String)>,
    tus_support: Option<TusCapability>,
}

impl FileInfo {
    pub(crate) fn new(
        path: String,
        is_collection: bool,
        properties: Vec<(PropertyName, String)>,
    ) -> Self {
        Self {
            path,
            is_collection,
            properties,
            tus_support: None,
        }
    }

    pub(crate) fn set_tus_support(&mut self, capability: TusCapability) {
        self.tus_support = Some(capability);
    }

    /// Decoded logical path, relative to the WebDAV mount.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last non-empty path segment; the filesystem root keeps `/`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("/")
    }

    /// Whether `resourcetype` carried a collection marker.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_collection
    }

    /// Raw value of a property the server reported with a success status.
    #[must_use]
    pub fn property(&self, name: &PropertyName) -> Option<&str> {
        self.raw_property(name.namespace(), name.name())
    }

    /// All reported properties in response order.
    #[must_use]
    pub fn properties(&self) -> &[(PropertyName, String)] {
        &self.properties
    }

    /// The `getetag` value.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.raw_property(ns::DAV, "getetag")
    }

    /// The `getcontenttype` value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.raw_property(ns::DAV, "getcontenttype")
    }

    /// The ownCloud file id used by the meta and systemtags endpoints.
    #[must_use]
    pub fn file_id(&self) -> Option<&str> {
        self.raw_property(ns::OWNCLOUD, "fileid")
    }

    /// Raw favorite flag exactly as the server currently reports it.
    #[must_use]
    pub fn favorite(&self) -> Option<&str> {
        self.raw_property(ns::OWNCLOUD, "favorite")
    }

    /// `getcontentlength` in bytes.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.raw_property(ns::DAV, "getcontentlength")
            .and_then(|value| value.trim().parse().ok())
    }

    /// ownCloud size (set for folders too), falling back to the content
    /// length.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.raw_property(ns::OWNCLOUD, "size")
            .and_then(|value| value.trim().parse().ok())
            .or_else(|| self.content_length())
    }

    /// `getlastmodified` parsed from its HTTP-date form.
    #[must_use]
    pub fn last_modified(&self) -> Option<Zoned> {
        self.raw_property(ns::DAV, "getlastmodified")
            .and_then(|value| HTTP_DATE.parse_zoned(value).ok())
    }

    /// Resumable-upload advertisement. Only the first entry of the response
    /// that carried the capability headers has one.
    #[must_use]
    pub fn tus_support(&self) -> Option<&TusCapability> {
        self.tus_support.as_ref()
    }

    fn raw_property(&self, namespace: &str, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(prop, _)| prop.namespace() == namespace && prop.name() == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A server-side system tag, created once and referenced by id thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagHandle {
    /// Numeric tag id assigned by the server.
    pub id: u64,
    /// Tag display name.
    pub name: String,
}
