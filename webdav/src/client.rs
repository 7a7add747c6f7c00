// SPDX-FileCopyrightText: 2025-2026 ocfiles contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Files client for ownCloud-compatible WebDAV servers.

use std::path::Path;
use std::sync::Arc;

use reqwest::Method;

use crate::capability;
use crate::config::FilesConfig;
use crate::error::{self, FilesError};
use crate::http::{HttpClient, XML_CONTENT_TYPE, dav_method};
use crate::path;
use crate::request::{FilterFilesRequest, PropFindRequest, PropPatchRequest, SearchRequest};
use crate::response::MultiStatus;
use crate::types::{Depth, FileInfo, PropertyName, TagHandle};

/// Classic WebDAV mount of the files app.
const WEBDAV_ROOT: &str = "/remote.php/webdav";
/// Root of the newer DAV endpoints (per-user files, meta, systemtags).
const DAV_ROOT: &str = "/remote.php/dav";

/// Client for managing files and folders on an ownCloud-compatible server.
///
/// Every operation is a single linear pipeline: build the request, execute
/// it, then either parse the multistatus answer or translate the failure.
/// The client is stateless beyond its immutable configuration, so it can be
/// cloned cheaply and shared across tasks.
///
/// # Example
///
/// ```ignore
/// use ocfiles_webdav::{AuthMethod, Depth, FilesClient, FilesConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FilesClient::new(FilesConfig {
///     base_url: "https://cloud.example.com".to_string(),
///     username: "alice".to_string(),
///     auth: AuthMethod::Basic {
///         username: "alice".to_string(),
///         password: "secret".to_string(),
///     },
///     ..Default::default()
/// })?;
///
/// for entry in client.list("/Documents", Depth::One).await? {
///     println!("{}", entry.name());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FilesClient {
    http: Arc<HttpClient>,
    config: FilesConfig,
}

impl FilesClient {
    /// Creates a new files client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: FilesConfig) -> Result<Self, FilesError> {
        let http = HttpClient::new(config.clone())?;
        Ok(Self {
            http: Arc::new(http),
            config,
        })
    }

    // ----- URL building -----

    /// Absolute URL of a path under the classic WebDAV mount.
    #[must_use]
    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}{}{}",
            self.base(),
            WEBDAV_ROOT,
            path::encode_path(&path::normalize_path(file_path))
        )
    }

    /// Absolute URL of a path under the per-user `dav/files` endpoint.
    #[must_use]
    pub fn file_url_v2(&self, file_path: &str) -> String {
        format!(
            "{}{}{}",
            self.base(),
            self.files_root(),
            path::encode_path(&path::normalize_path(file_path))
        )
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn files_root(&self) -> String {
        format!(
            "{}/files/{}",
            DAV_ROOT,
            path::encode_path(&self.config.username)
        )
    }

    // ----- Listing and metadata -----

    /// Lists a folder.
    ///
    /// The returned sequence preserves server order: the target resource
    /// itself first, then its entries. [`Depth::Limit`] asks the server for
    /// `infinity` and truncates the parsed sequence client-side by relative
    /// path depth.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] naming the requested path when the
    /// folder does not exist.
    pub async fn list(&self, folder_path: &str, depth: Depth) -> Result<Vec<FileInfo>, FilesError> {
        let logical = path::normalize_path(folder_path);
        tracing::debug!(path = %logical, depth = depth.header_value(), "listing folder");

        let body = PropFindRequest::new().build()?;
        let resp = self
            .http
            .execute(
                self.http
                    .build_request(dav_method("PROPFIND")?, &self.file_url(&logical))
                    .header("Depth", depth.header_value())
                    .header("Content-Type", XML_CONTENT_TYPE)
                    .body(body),
            )
            .await?;
        let resp = error::ensure_success(resp, &logical).await?;

        let headers = resp.headers().clone();
        let xml = resp.text().await?;
        let mut entries = MultiStatus::from_xml(&xml)?.into_resources(WEBDAV_ROOT)?;

        if let Some(limit) = depth.client_limit() {
            entries.retain(|entry| {
                path::relative_depth(&logical, entry.path()).is_none_or(|d| d <= limit)
            });
        }
        capability::attach_tus_support(&headers, &mut entries);
        Ok(entries)
    }

    /// Fetches a single resource's properties (depth `0`).
    ///
    /// An empty `properties` slice requests the server's default property
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] naming the requested path when the
    /// resource does not exist.
    pub async fn file_info(
        &self,
        file_path: &str,
        properties: &[PropertyName],
    ) -> Result<FileInfo, FilesError> {
        let logical = path::normalize_path(file_path);
        tracing::debug!(path = %logical, requested = properties.len(), "fetching file info");

        let mut propfind = PropFindRequest::new();
        for prop in properties {
            propfind.add_property(prop.clone());
        }
        let body = propfind.build()?;
        let resp = self
            .http
            .execute(
                self.http
                    .build_request(dav_method("PROPFIND")?, &self.file_url(&logical))
                    .header("Depth", Depth::Zero.header_value())
                    .header("Content-Type", XML_CONTENT_TYPE)
                    .body(body),
            )
            .await?;
        let resp = error::ensure_success(resp, &logical).await?;

        let headers = resp.headers().clone();
        let xml = resp.text().await?;
        let mut entries = MultiStatus::from_xml(&xml)?.into_resources(WEBDAV_ROOT)?;
        capability::attach_tus_support(&headers, &mut entries);
        entries
            .into_iter()
            .next()
            .ok_or_else(|| FilesError::MalformedResponse {
                message: format!("empty multistatus for {logical}"),
            })
    }

    /// Whether a resource exists.
    ///
    /// This is the one place a translated [`FilesError::NotFound`] becomes a
    /// successful negative answer; every other failure propagates.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the resource missing.
    pub async fn exists(&self, file_path: &str) -> Result<bool, FilesError> {
        match self.file_info(file_path, &[]).await {
            Ok(_) => Ok(true),
            Err(FilesError::NotFound { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }

    // ----- Contents -----

    /// Downloads a file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] naming the requested path when the
    /// file does not exist.
    pub async fn get_file_contents(&self, file_path: &str) -> Result<Vec<u8>, FilesError> {
        let logical = path::normalize_path(file_path);
        tracing::debug!(path = %logical, "downloading file contents");

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(Method::GET, &self.file_url(&logical)),
            )
            .await?;
        let resp = error::ensure_success(resp, &logical).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Uploads file contents, creating or overwriting the remote file.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection, e.g.
    /// [`FilesError::NotFound`] when the parent folder is missing.
    pub async fn put_file_contents(
        &self,
        file_path: &str,
        data: Vec<u8>,
    ) -> Result<(), FilesError> {
        let logical = path::normalize_path(file_path);
        tracing::debug!(path = %logical, bytes = data.len(), "uploading file contents");

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(Method::PUT, &self.file_url(&logical))
                    .header("Content-Type", "application/octet-stream")
                    .body(data),
            )
            .await?;
        error::ensure_success(resp, &logical).await?;
        Ok(())
    }

    /// Downloads a remote file to a local path.
    ///
    /// # Errors
    ///
    /// Fails on the remote read or the local write.
    pub async fn download_file(
        &self,
        remote_path: &str,
        local_path: impl AsRef<Path>,
    ) -> Result<(), FilesError> {
        let contents = self.get_file_contents(remote_path).await?;
        tokio::fs::write(local_path, contents).await?;
        Ok(())
    }

    /// Uploads a local file to a remote path.
    ///
    /// # Errors
    ///
    /// Fails on the local read or the remote write.
    pub async fn upload_file(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<(), FilesError> {
        let contents = tokio::fs::read(local_path).await?;
        self.put_file_contents(remote_path, contents).await
    }

    // ----- Folder management -----

    /// Creates a folder.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection, e.g.
    /// [`FilesError::Conflict`] when the parent folder is missing.
    pub async fn mkdir(&self, folder_path: &str) -> Result<(), FilesError> {
        let logical = path::normalize_path(folder_path);
        tracing::debug!(path = %logical, "creating folder");

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(dav_method("MKCOL")?, &self.file_url(&logical)),
            )
            .await?;
        error::ensure_success(resp, &logical).await?;
        Ok(())
    }

    /// Deletes a file or folder.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] naming the requested path when the
    /// resource does not exist.
    pub async fn delete(&self, file_path: &str) -> Result<(), FilesError> {
        let logical = path::normalize_path(file_path);
        tracing::debug!(path = %logical, "deleting resource");

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(Method::DELETE, &self.file_url(&logical)),
            )
            .await?;
        error::ensure_success(resp, &logical).await?;
        Ok(())
    }

    /// Moves a resource.
    ///
    /// The destination travels as a fully encoded absolute URL in the
    /// `Destination` header. An identical source and destination is not
    /// pre-checked locally: the server's 403/409 rejection is translated and
    /// surfaced as-is, keeping it the single source of truth.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection.
    pub async fn move_file(
        &self,
        source_path: &str,
        destination_path: &str,
    ) -> Result<(), FilesError> {
        self.relocate("MOVE", source_path, destination_path).await
    }

    /// Copies a resource. Same `Destination` semantics as [`move_file`].
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection.
    ///
    /// [`move_file`]: Self::move_file
    pub async fn copy_file(
        &self,
        source_path: &str,
        destination_path: &str,
    ) -> Result<(), FilesError> {
        self.relocate("COPY", source_path, destination_path).await
    }

    async fn relocate(
        &self,
        verb: &str,
        source_path: &str,
        destination_path: &str,
    ) -> Result<(), FilesError> {
        let source = path::normalize_path(source_path);
        let destination = path::normalize_path(destination_path);
        tracing::debug!(%source, %destination, verb, "relocating resource");

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(dav_method(verb)?, &self.file_url(&source))
                    .header("Destination", self.file_url(&destination)),
            )
            .await?;
        error::ensure_success(resp, &source).await?;
        Ok(())
    }

    // ----- Favorites, search and tags -----

    /// Marks or unmarks a file as favorite.
    ///
    /// The flag is sent as the lexical `true`/`false` literal. Whatever the
    /// server reports back afterwards (`1`/`0` on some implementations) is
    /// returned verbatim by property fetches.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection.
    pub async fn favorite(&self, file_path: &str, value: bool) -> Result<(), FilesError> {
        let logical = path::normalize_path(file_path);
        tracing::debug!(path = %logical, value, "updating favorite flag");

        let body = PropPatchRequest::new()
            .set(
                PropertyName::oc("favorite"),
                if value { "true" } else { "false" },
            )
            .build()?;
        let resp = self
            .http
            .execute(
                self.http
                    .build_request(dav_method("PROPPATCH")?, &self.file_url(&logical))
                    .header("Content-Type", XML_CONTENT_TYPE)
                    .body(body),
            )
            .await?;
        error::ensure_success(resp, &logical).await?;
        Ok(())
    }

    /// Searches file names matching a pattern.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection or a parse failure.
    pub async fn search(
        &self,
        pattern: &str,
        limit: Option<u32>,
        properties: &[PropertyName],
    ) -> Result<Vec<FileInfo>, FilesError> {
        tracing::debug!(pattern, ?limit, "searching files");

        let mut request = SearchRequest::new(pattern);
        if let Some(limit) = limit {
            request = request.limit(limit);
        }
        for prop in properties {
            request = request.add_property(prop.clone());
        }
        self.report(request.build()?).await
    }

    /// Lists files flagged as favorite.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection or a parse failure.
    pub async fn favorite_files(
        &self,
        properties: &[PropertyName],
    ) -> Result<Vec<FileInfo>, FilesError> {
        tracing::debug!("listing favorite files");

        let mut request = FilterFilesRequest::new().favorite();
        for prop in properties {
            request = request.add_property(prop.clone());
        }
        self.report(request.build()?).await
    }

    /// Lists files carrying all the given system tags.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection or a parse failure.
    pub async fn files_by_tag(
        &self,
        tag_ids: &[u64],
        properties: &[PropertyName],
    ) -> Result<Vec<FileInfo>, FilesError> {
        tracing::debug!(tags = ?tag_ids, "listing files by tag");

        let mut request = FilterFilesRequest::new().tags(tag_ids);
        for prop in properties {
            request = request.add_property(prop.clone());
        }
        self.report(request.build()?).await
    }

    /// Runs a REPORT against the per-user files root and parses the answer.
    async fn report(&self, body: String) -> Result<Vec<FileInfo>, FilesError> {
        let files_root = self.files_root();
        let url = format!("{}{}/", self.base(), files_root);

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(dav_method("REPORT")?, &url)
                    .header("Content-Type", XML_CONTENT_TYPE)
                    .body(body),
            )
            .await?;
        let resp = error::ensure_success(resp, "/").await?;
        let xml = resp.text().await?;
        MultiStatus::from_xml(&xml)?.into_resources(&files_root)
    }

    /// Creates a system tag and returns its handle.
    ///
    /// The server communicates the new tag id through the
    /// `Content-Location` header of its 201 answer.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection, or
    /// [`FilesError::MalformedResponse`] when no tag id comes back.
    pub async fn create_tag(&self, name: &str) -> Result<TagHandle, FilesError> {
        tracing::debug!(name, "creating system tag");

        let url = format!("{}{}/systemtags", self.base(), DAV_ROOT);
        let body = serde_json::json!({
            "canAssign": true,
            "name": name,
            "userAssignable": true,
            "userEditable": true,
            "userVisible": true,
        });
        let resp = self
            .http
            .execute(
                self.http
                    .build_request(Method::POST, &url)
                    .header("Content-Type", "application/json")
                    .body(body.to_string()),
            )
            .await?;
        let resp = error::ensure_success(resp, name).await?;

        let location = resp
            .headers()
            .get("Content-Location")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| FilesError::MalformedResponse {
                message: "tag creation answer carries no Content-Location".to_string(),
            })?;
        let id = location
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .and_then(|segment| segment.parse().ok())
            .ok_or_else(|| FilesError::MalformedResponse {
                message: format!("no tag id in Content-Location {location}"),
            })?;
        Ok(TagHandle {
            id,
            name: name.to_string(),
        })
    }

    /// Assigns an existing system tag to a file.
    ///
    /// # Errors
    ///
    /// Returns the translated server rejection.
    pub async fn tag_file(&self, file_id: &str, tag_id: u64) -> Result<(), FilesError> {
        tracing::debug!(file_id, tag_id, "tagging file");

        let url = format!(
            "{}{}/systemtags-relations/files/{}/{}",
            self.base(),
            DAV_ROOT,
            file_id,
            tag_id
        );
        let resp = self
            .http
            .execute(self.http.build_request(Method::PUT, &url))
            .await?;
        error::ensure_success(resp, file_id).await?;
        Ok(())
    }

    /// Resolves the user-visible path of a file identified by its file id.
    ///
    /// Two sequential lookups: the meta endpoint yields the path, then a
    /// depth-`0` property fetch at that path confirms it is addressable.
    /// The first failing step aborts the chain.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] naming the file id when it cannot be
    /// resolved.
    pub async fn path_for_file_id(&self, file_id: &str) -> Result<String, FilesError> {
        tracing::debug!(file_id, "resolving path for file id");

        let meta_root = format!("{DAV_ROOT}/meta");
        let url = format!("{}{}/{}", self.base(), meta_root, file_id);
        let mut propfind = PropFindRequest::new();
        propfind.add_property(PropertyName::oc("meta-path-for-user"));
        let body = propfind.build()?;

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(dav_method("PROPFIND")?, &url)
                    .header("Depth", Depth::Zero.header_value())
                    .header("Content-Type", XML_CONTENT_TYPE)
                    .body(body),
            )
            .await?;
        let resp = error::ensure_success(resp, file_id).await?;
        let xml = resp.text().await?;
        let entries = MultiStatus::from_xml(&xml)?.into_resources(&meta_root)?;

        let meta_path = PropertyName::oc("meta-path-for-user");
        let resolved = entries
            .first()
            .and_then(|entry| entry.property(&meta_path))
            .map(path::normalize_path)
            .ok_or_else(|| FilesError::NotFound {
                path: file_id.to_string(),
            })?;

        self.file_info(&resolved, &[PropertyName::oc("fileid")])
            .await?;
        Ok(resolved)
    }
}
