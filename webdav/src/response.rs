// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Multistatus response parsing.
//!
//! The parser is namespace-aware: property keys are resolved
//! (namespace, local-name) pairs, not prefixes, so `d:`/`D:`/default-ns
//! documents all read the same.

use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};

use crate::error::FilesError;
use crate::path;
use crate::types::{FileInfo, PropertyName};
use crate::xml::ns;

/// A parsed `d:multistatus` document: one unit per addressed resource, in
/// document order. Order is significant; a folder listing reports the target
/// collection itself before its entries.
#[derive(Debug, Clone)]
pub struct MultiStatus {
    /// The response units.
    pub responses: Vec<ResponseUnit>,
}

/// One `<d:response>` element.
#[derive(Debug, Clone)]
pub struct ResponseUnit {
    /// Raw, still percent-encoded href.
    pub href: String,
    /// Unit-level status, present on bodies without propstat groups.
    pub status: Option<String>,
    /// Propstat groups in document order.
    pub propstats: Vec<PropStat>,
}

/// One `<d:propstat>` group with its own status line.
#[derive(Debug, Clone)]
pub struct PropStat {
    /// Status line, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
    /// Properties in document order, values as raw text.
    pub props: Vec<(PropertyName, String)>,
    pub(crate) has_collection_marker: bool,
}

impl PropStat {
    /// Whether this group's status code is in the HTTP success range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse::<u16>().ok())
            .is_some_and(|code| (200..300).contains(&code))
    }
}

impl MultiStatus {
    /// Parses a multistatus response body.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::MalformedResponse`] when the body is not
    /// well-formed XML or contains no `<d:response>` units.
    pub fn from_xml(xml: &str) -> Result<Self, FilesError> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = true;

        let mut responses = Vec::new();
        let mut href = String::new();
        let mut unit_status: Option<String> = None;
        let mut propstats: Vec<PropStat> = Vec::new();
        let mut props: Vec<(PropertyName, String)> = Vec::new();
        let mut collection_marker = false;
        let mut group_status: Option<String> = None;
        let mut in_response = false;
        let mut in_propstat = false;
        let mut in_prop = false;

        loop {
            match reader.read_resolved_event()? {
                (ResolveResult::Bound(namespace), Event::Start(element)) => {
                    let dav = namespace.as_ref() == ns::DAV.as_bytes();
                    match element.local_name().as_ref() {
                        b"response" if dav && !in_prop => {
                            in_response = true;
                            href.clear();
                            unit_status = None;
                            propstats.clear();
                        }
                        b"href" if dav && in_response && !in_propstat => {
                            if let (_, Event::Text(text)) = reader.read_resolved_event()? {
                                href = unescape(&text.decode()?)?.into_owned();
                            }
                        }
                        b"propstat" if dav && in_response && !in_prop => {
                            in_propstat = true;
                            props.clear();
                            collection_marker = false;
                            group_status = None;
                        }
                        b"prop" if dav && in_propstat && !in_prop => in_prop = true,
                        b"status" if dav && !in_prop => {
                            if let (_, Event::Text(text)) = reader.read_resolved_event()? {
                                let value = unescape(&text.decode()?)?.into_owned();
                                if in_propstat {
                                    group_status = Some(value);
                                } else if in_response {
                                    unit_status = Some(value);
                                }
                            }
                        }
                        b"resourcetype" if dav && in_prop => {
                            let (_, saw_collection) = read_prop_content(&mut reader)?;
                            collection_marker = saw_collection;
                            props.push((
                                PropertyName::new(ns::DAV, "resourcetype"),
                                if saw_collection {
                                    "collection".to_string()
                                } else {
                                    String::new()
                                },
                            ));
                        }
                        _ if in_prop => {
                            let name = property_name(&namespace, &element)?;
                            let (value, _) = read_prop_content(&mut reader)?;
                            props.push((name, value));
                        }
                        _ => {}
                    }
                }
                (ResolveResult::Unbound, Event::Start(element)) if in_prop => {
                    let name = unbound_property_name(&element)?;
                    let (value, _) = read_prop_content(&mut reader)?;
                    props.push((name, value));
                }
                (ResolveResult::Bound(namespace), Event::Empty(element)) if in_prop => {
                    let dav = namespace.as_ref() == ns::DAV.as_bytes();
                    if dav && element.local_name().as_ref() == b"resourcetype" {
                        collection_marker = false;
                        props.push((PropertyName::new(ns::DAV, "resourcetype"), String::new()));
                    } else {
                        props.push((property_name(&namespace, &element)?, String::new()));
                    }
                }
                (ResolveResult::Unbound, Event::Empty(element)) if in_prop => {
                    props.push((unbound_property_name(&element)?, String::new()));
                }
                (ResolveResult::Bound(namespace), Event::End(element)) => {
                    let dav = namespace.as_ref() == ns::DAV.as_bytes();
                    match element.local_name().as_ref() {
                        b"prop" if dav && in_prop => in_prop = false,
                        b"propstat" if dav && in_propstat => {
                            in_propstat = false;
                            propstats.push(PropStat {
                                status: group_status.take().unwrap_or_default(),
                                props: std::mem::take(&mut props),
                                has_collection_marker: collection_marker,
                            });
                        }
                        b"response" if dav && in_response => {
                            in_response = false;
                            responses.push(ResponseUnit {
                                href: std::mem::take(&mut href),
                                status: unit_status.take(),
                                propstats: std::mem::take(&mut propstats),
                            });
                        }
                        b"multistatus" if dav => break,
                        _ => {}
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        if responses.is_empty() {
            return Err(FilesError::MalformedResponse {
                message: "no response entries in multistatus body".to_string(),
            });
        }
        Ok(Self { responses })
    }

    /// Converts units into resource descriptors.
    ///
    /// Hrefs are decoded against `root_prefix`; only success-status groups
    /// contribute properties, so a property reported under a 404 group is
    /// absent from the descriptor rather than empty. A missing
    /// `resourcetype` means non-collection.
    ///
    /// # Errors
    ///
    /// Fails when an href cannot be decoded.
    pub fn into_resources(self, root_prefix: &str) -> Result<Vec<FileInfo>, FilesError> {
        self.responses
            .into_iter()
            .map(|unit| {
                let resource_path = path::decode_href(&unit.href, root_prefix)?;
                let mut is_collection = false;
                let mut properties = Vec::new();
                for group in unit.propstats.into_iter().filter(PropStat::is_success) {
                    is_collection = is_collection || group.has_collection_marker;
                    properties.extend(group.props);
                }
                Ok(FileInfo::new(resource_path, is_collection, properties))
            })
            .collect()
    }
}

/// Reads a property element to its end tag, concatenating descendant text
/// and noting a `d:collection` marker on the way.
fn read_prop_content(reader: &mut NsReader<&[u8]>) -> Result<(String, bool), FilesError> {
    let mut depth = 1usize;
    let mut text = String::new();
    let mut saw_collection = false;

    while depth > 0 {
        match reader.read_resolved_event()? {
            (namespace, Event::Start(element)) => {
                if is_collection_marker(&namespace, &element) {
                    saw_collection = true;
                }
                depth += 1;
            }
            (namespace, Event::Empty(element)) => {
                if is_collection_marker(&namespace, &element) {
                    saw_collection = true;
                }
            }
            (_, Event::End(_)) => depth -= 1,
            (_, Event::Text(chunk)) => text.push_str(&unescape(&chunk.decode()?)?),
            (_, Event::GeneralRef(entity)) => {
                let decoded = entity.decode()?;
                text.push_str(&unescape(&format!("&{decoded};"))?);
            }
            (_, Event::CData(cdata)) => {
                let bytes = cdata.into_inner();
                let chunk = std::str::from_utf8(&bytes).map_err(|e| {
                    FilesError::MalformedResponse {
                        message: format!("invalid UTF-8 in property value: {e}"),
                    }
                })?;
                text.push_str(chunk);
            }
            (_, Event::Eof) => {
                return Err(FilesError::MalformedResponse {
                    message: "unexpected end of multistatus body".to_string(),
                });
            }
            _ => {}
        }
    }

    Ok((text, saw_collection))
}

fn is_collection_marker(namespace: &ResolveResult<'_>, element: &BytesStart<'_>) -> bool {
    matches!(namespace, ResolveResult::Bound(bound) if bound.as_ref() == ns::DAV.as_bytes())
        && element.local_name().as_ref() == b"collection"
}

fn property_name(
    namespace: &Namespace<'_>,
    element: &BytesStart<'_>,
) -> Result<PropertyName, FilesError> {
    let namespace = std::str::from_utf8(namespace.as_ref()).map_err(|e| {
        FilesError::MalformedResponse {
            message: format!("invalid UTF-8 in property namespace: {e}"),
        }
    })?;
    let local = local_name_str(element)?;
    Ok(PropertyName::new(namespace, local))
}

fn unbound_property_name(element: &BytesStart<'_>) -> Result<PropertyName, FilesError> {
    Ok(PropertyName::new("", local_name_str(element)?))
}

fn local_name_str(element: &BytesStart<'_>) -> Result<String, FilesError> {
    std::str::from_utf8(element.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| FilesError::MalformedResponse {
            message: format!("invalid UTF-8 in property name: {e}"),
        })
}
