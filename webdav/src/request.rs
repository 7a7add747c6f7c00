// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Request body builders for the WebDAV file operations.
//!
//! Builders are pure: input in, XML document out, no network concerns. The
//! fixed prefixes `d:` and `oc:` are always declared on the root element;
//! properties from any other namespace get generated `x1`, `x2`, ...
//! prefixes.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::FilesError;
use crate::types::PropertyName;
use crate::xml::ns;

/// PROPFIND request builder.
///
/// An empty property list asks the server for its default property set.
#[derive(Debug)]
pub struct PropFindRequest {
    props: Vec<PropertyName>,
}

impl PropFindRequest {
    /// Creates a new PROPFIND request.
    #[must_use]
    pub fn new() -> Self {
        Self { props: Vec::new() }
    }

    /// Adds a property to the request.
    pub fn add_property(&mut self, prop: PropertyName) -> &mut Self {
        self.props.push(prop);
        self
    }

    /// Builds the XML body for the PROPFIND request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, FilesError> {
        let extra = extra_namespaces(self.props.iter());
        let mut writer = document_writer()?;

        writer.write_event(Event::Start(root_element("d:propfind", &extra)))?;
        writer.write_event(Event::Start(BytesStart::new("d:prop")))?;
        for prop in &self.props {
            writer.write_event(Event::Empty(BytesStart::new(qualified_name(prop, &extra))))?;
        }
        writer.write_event(Event::End(BytesEnd::new("d:prop")))?;
        writer.write_event(Event::End(BytesEnd::new("d:propfind")))?;

        into_document(writer)
    }
}

impl Default for PropFindRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// PROPPATCH request builder.
///
/// Values are written exactly as supplied. The favorite flag in particular is
/// round-tripped as `1` by some server variants and as lexical `true` by
/// others, so any coercion belongs to the caller.
#[derive(Debug, Default)]
pub struct PropPatchRequest {
    set: Vec<(PropertyName, String)>,
    remove: Vec<PropertyName>,
}

impl PropPatchRequest {
    /// Creates a new PROPPATCH request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property to a caller-supplied literal value.
    #[must_use]
    pub fn set(mut self, prop: PropertyName, value: impl Into<String>) -> Self {
        self.set.push((prop, value.into()));
        self
    }

    /// Removes a property.
    #[must_use]
    pub fn remove(mut self, prop: PropertyName) -> Self {
        self.remove.push(prop);
        self
    }

    /// Builds the XML body for the PROPPATCH request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, FilesError> {
        let extra = extra_namespaces(self.set.iter().map(|(prop, _)| prop).chain(&self.remove));
        let mut writer = document_writer()?;

        writer.write_event(Event::Start(root_element("d:propertyupdate", &extra)))?;

        if !self.set.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("d:set")))?;
            writer.write_event(Event::Start(BytesStart::new("d:prop")))?;
            for (prop, value) in &self.set {
                let name = qualified_name(prop, &extra);
                writer.write_event(Event::Start(BytesStart::new(name.clone())))?;
                writer.write_event(Event::Text(BytesText::new(value)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            writer.write_event(Event::End(BytesEnd::new("d:prop")))?;
            writer.write_event(Event::End(BytesEnd::new("d:set")))?;
        }

        if !self.remove.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("d:remove")))?;
            writer.write_event(Event::Start(BytesStart::new("d:prop")))?;
            for prop in &self.remove {
                writer.write_event(Event::Empty(BytesStart::new(qualified_name(prop, &extra))))?;
            }
            writer.write_event(Event::End(BytesEnd::new("d:prop")))?;
            writer.write_event(Event::End(BytesEnd::new("d:remove")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("d:propertyupdate")))?;

        into_document(writer)
    }
}

/// Builder for the `oc:search-files` REPORT.
#[derive(Debug)]
pub struct SearchRequest {
    pattern: String,
    limit: Option<u32>,
    props: Vec<PropertyName>,
}

impl SearchRequest {
    /// Creates a file name search for the given pattern.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            limit: None,
            props: Vec::new(),
        }
    }

    /// Caps the number of results the server returns.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Adds a property to request for each match.
    #[must_use]
    pub fn add_property(mut self, prop: PropertyName) -> Self {
        self.props.push(prop);
        self
    }

    /// Builds the XML body for the search REPORT.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, FilesError> {
        let extra = extra_namespaces(self.props.iter());
        let mut writer = document_writer()?;

        writer.write_event(Event::Start(root_element("oc:search-files", &extra)))?;
        write_prop_list(&mut writer, &self.props, &extra)?;

        writer.write_event(Event::Start(BytesStart::new("oc:search")))?;
        writer.write_event(Event::Start(BytesStart::new("oc:pattern")))?;
        writer.write_event(Event::Text(BytesText::new(&self.pattern)))?;
        writer.write_event(Event::End(BytesEnd::new("oc:pattern")))?;
        if let Some(limit) = self.limit {
            writer.write_event(Event::Start(BytesStart::new("oc:limit")))?;
            writer.write_event(Event::Text(BytesText::new(&limit.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("oc:limit")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("oc:search")))?;

        writer.write_event(Event::End(BytesEnd::new("oc:search-files")))?;

        into_document(writer)
    }
}

/// One rule inside an `oc:filter-files` REPORT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    /// Only resources flagged as favorite.
    Favorite,
    /// Only resources carrying this system tag.
    Tag(u64),
}

/// Builder for the `oc:filter-files` REPORT (favorites, tag filters).
#[derive(Debug, Default)]
pub struct FilterFilesRequest {
    rules: Vec<FilterRule>,
    props: Vec<PropertyName>,
}

impl FilterFilesRequest {
    /// Creates an empty filter request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to favorites.
    #[must_use]
    pub fn favorite(mut self) -> Self {
        self.rules.push(FilterRule::Favorite);
        self
    }

    /// Restricts results to resources carrying all the given tags.
    #[must_use]
    pub fn tags(mut self, tag_ids: &[u64]) -> Self {
        self.rules
            .extend(tag_ids.iter().map(|&id| FilterRule::Tag(id)));
        self
    }

    /// Adds a property to request for each match.
    #[must_use]
    pub fn add_property(mut self, prop: PropertyName) -> Self {
        self.props.push(prop);
        self
    }

    /// Builds the XML body for the filter REPORT.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, FilesError> {
        let extra = extra_namespaces(self.props.iter());
        let mut writer = document_writer()?;

        writer.write_event(Event::Start(root_element("oc:filter-files", &extra)))?;
        write_prop_list(&mut writer, &self.props, &extra)?;

        writer.write_event(Event::Start(BytesStart::new("oc:filter-rules")))?;
        for rule in &self.rules {
            match rule {
                FilterRule::Favorite => {
                    writer.write_event(Event::Start(BytesStart::new("oc:favorite")))?;
                    writer.write_event(Event::Text(BytesText::new("1")))?;
                    writer.write_event(Event::End(BytesEnd::new("oc:favorite")))?;
                }
                FilterRule::Tag(id) => {
                    writer.write_event(Event::Start(BytesStart::new("oc:systemtag")))?;
                    writer.write_event(Event::Text(BytesText::new(&id.to_string())))?;
                    writer.write_event(Event::End(BytesEnd::new("oc:systemtag")))?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new("oc:filter-rules")))?;

        writer.write_event(Event::End(BytesEnd::new("oc:filter-files")))?;

        into_document(writer)
    }
}

fn document_writer() -> Result<Writer<Cursor<Vec<u8>>>, FilesError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    Ok(writer)
}

fn root_element(name: &str, extra: &[String]) -> BytesStart<'static> {
    let mut root = BytesStart::new(name.to_string());
    root.push_attribute(("xmlns:d", ns::DAV));
    root.push_attribute(("xmlns:oc", ns::OWNCLOUD));
    for (i, namespace) in extra.iter().enumerate() {
        root.push_attribute((format!("xmlns:x{}", i + 1).as_str(), namespace.as_str()));
    }
    root
}

fn write_prop_list(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    props: &[PropertyName],
    extra: &[String],
) -> Result<(), FilesError> {
    writer.write_event(Event::Start(BytesStart::new("d:prop")))?;
    for prop in props {
        writer.write_event(Event::Empty(BytesStart::new(qualified_name(prop, extra))))?;
    }
    writer.write_event(Event::End(BytesEnd::new("d:prop")))?;
    Ok(())
}

fn extra_namespaces<'a>(props: impl Iterator<Item = &'a PropertyName>) -> Vec<String> {
    let mut extra: Vec<String> = Vec::new();
    for prop in props {
        let namespace = prop.namespace();
        if namespace != ns::DAV
            && namespace != ns::OWNCLOUD
            && !extra.iter().any(|known| known == namespace)
        {
            extra.push(namespace.to_string());
        }
    }
    extra
}

fn qualified_name(prop: &PropertyName, extra: &[String]) -> String {
    if prop.namespace() == ns::DAV {
        format!("d:{}", prop.name())
    } else if prop.namespace() == ns::OWNCLOUD {
        format!("oc:{}", prop.name())
    } else {
        let idx = extra
            .iter()
            .position(|known| known == prop.namespace())
            .unwrap_or(0);
        format!("x{}:{}", idx + 1, prop.name())
    }
}

fn into_document(writer: Writer<Cursor<Vec<u8>>>) -> Result<String, FilesError> {
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| FilesError::MalformedResponse {
        message: format!("UTF-8 error: {e}"),
    })
}
