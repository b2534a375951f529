// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WebDAV` verbs on top of the transport.

use std::path::Path;

use crate::config::{Credentials, StatusPolicy, WebDavConfig};
use crate::cookie::CookieJar;
use crate::error::WebDavError;
use crate::http::{DavMethod, Transport};
use crate::response::{HttpResponse, ResponseHead};
use crate::types::DavProperties;
use crate::xml::Multistatus;

/// `WebDAV` client bound to one remote collection root.
///
/// A client only exists once the root has answered `HEAD` with `200`.
/// Every verb awaits exactly one request. Verbs take `&mut self` because
/// each call updates the session cookies and the last response head; wrap
/// the client in a mutex to share it between tasks.
///
/// Non-2xx responses are returned as-is under the default
/// [`StatusPolicy::Permissive`]; check [`last_response`](Self::last_response)
/// or configure [`StatusPolicy::RequireSuccess`].
///
/// # Example
///
/// ```ignore
/// use davlite::WebDavClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client =
///     WebDavClient::connect("https://dav.example.com/remote.php/webdav", "user", "pass").await?;
///
/// client.mkdir("notes").await?;
/// client.create("notes/todo.txt", b"buy milk".to_vec()).await?;
/// for entry in client.list("/notes").await? {
///     println!("{entry}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WebDavClient {
    transport: Transport,
    root_url: String,
    root_path: String,
    status_policy: StatusPolicy,
}

impl WebDavClient {
    /// Validates `root_url` with Basic credentials and default settings.
    ///
    /// # Errors
    ///
    /// See [`with_config`](Self::with_config).
    pub async fn connect(
        root_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, WebDavError> {
        let config = WebDavConfig::new(root_url, Credentials::new(username, password));
        Self::with_config(config).await
    }

    /// Validates the configured root with a `HEAD` request.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::Config`] if the root is not an absolute URL,
    /// [`WebDavError::Transport`] if the `HEAD` request cannot be sent, and
    /// [`WebDavError::Initialization`] if it is not answered with `200`.
    #[tracing::instrument(skip_all, fields(root = %config.root_url))]
    pub async fn with_config(config: WebDavConfig) -> Result<Self, WebDavError> {
        let root_path = reqwest::Url::parse(&config.root_url)
            .map_err(|e| WebDavError::Config(format!("Invalid root URL {}: {e}", config.root_url)))?
            .path()
            .to_string();

        let mut transport = Transport::new(&config)?;
        let resp = transport
            .send(DavMethod::Head, &config.root_url, None, &[])
            .await?;

        if resp.status() != Some(200) {
            tracing::warn!(status = ?resp.status(), "remote root validation failed");
            return Err(WebDavError::Initialization {
                url: config.root_url,
                status: resp.status(),
            });
        }

        tracing::debug!("remote root validated");
        Ok(Self {
            transport,
            root_url: config.root_url,
            root_path,
            status_policy: config.status_policy,
        })
    }

    /// Returns the validated remote root URL.
    #[must_use]
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Returns the head of the most recent response.
    #[must_use]
    pub const fn last_response(&self) -> Option<&ResponseHead> {
        self.transport.last_response()
    }

    /// Returns the session cookies collected so far.
    #[must_use]
    pub const fn cookies(&self) -> &CookieJar {
        self.transport.cookies()
    }

    /// Lists the children of `folder` (relative to the root, e.g. `""` or `"/docs"`).
    ///
    /// Entries are the hrefs of the PROPFIND response in document order,
    /// without the first one (the folder itself), with the root path and
    /// `folder` prefix removed. Entries that become empty are dropped.
    ///
    /// The root path is the path of the root URL, so a bare-host root such
    /// as `https://host` has root path `/` and the leading `/` is stripped
    /// from every href.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not well-formed XML.
    #[tracing::instrument(skip(self))]
    pub async fn list(&mut self, folder: &str) -> Result<Vec<String>, WebDavError> {
        let url = format!("{}{folder}", self.root_url);
        let resp = self.request(DavMethod::Propfind, &url, None).await?;
        let doc = Multistatus::from_xml(&resp.body)?;

        let prefix = format!("{}{folder}", self.root_path);
        let entries: Vec<String> = doc
            .hrefs
            .into_iter()
            .skip(1)
            .map(|href| match href.strip_prefix(&prefix) {
                Some(relative) => relative.to_string(),
                None => href,
            })
            .filter(|entry| !entry.is_empty())
            .collect();

        tracing::debug!(count = entries.len(), "listed folder");
        Ok(entries)
    }

    /// Downloads `remote_file` and returns the body unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn get(&mut self, remote_file: &str) -> Result<Vec<u8>, WebDavError> {
        let url = self.resource_url(remote_file);
        let resp = self.request(DavMethod::Get, &url, None).await?;
        Ok(resp.body)
    }

    /// Uploads the local file `local_file` to `remote_file`.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::NotFound`] without contacting the server if
    /// `local_file` is not an existing regular file, or an error if reading
    /// it or the request fails.
    #[tracing::instrument(skip(self, local_file), fields(local = %local_file.as_ref().display()))]
    pub async fn upload(
        &mut self,
        local_file: impl AsRef<Path>,
        remote_file: &str,
    ) -> Result<(), WebDavError> {
        let local_file = local_file.as_ref();
        let is_file = tokio::fs::metadata(local_file)
            .await
            .is_ok_and(|m| m.is_file());
        if !is_file {
            return Err(WebDavError::NotFound(local_file.to_path_buf()));
        }

        let content = tokio::fs::read(local_file).await?;
        self.create(remote_file, content).await
    }

    /// Writes `content` to `remote_file`, creating or replacing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, content))]
    pub async fn create(
        &mut self,
        remote_file: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<(), WebDavError> {
        let url = self.resource_url(remote_file);
        self.request(DavMethod::Put, &url, Some(content.into()))
            .await?;
        Ok(())
    }

    /// Deletes `remote_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, remote_file: &str) -> Result<(), WebDavError> {
        let url = self.resource_url(remote_file);
        self.request(DavMethod::Delete, &url, None).await?;
        Ok(())
    }

    /// Creates the collection `remote_folder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn mkdir(&mut self, remote_folder: &str) -> Result<(), WebDavError> {
        let url = self.resource_url(remote_folder);
        self.request(DavMethod::Mkcol, &url, None).await?;
        Ok(())
    }

    /// Reads the href, modification time, length and content type of `remote_file`.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::Decode`] if any of the four properties is
    /// missing or malformed, or an error if the request or XML parsing fails.
    #[tracing::instrument(skip(self))]
    pub async fn prop(&mut self, remote_file: &str) -> Result<DavProperties, WebDavError> {
        let url = self.resource_url(remote_file);
        let resp = self.request(DavMethod::Propfind, &url, None).await?;
        let doc = Multistatus::from_xml(&resp.body)?;
        DavProperties::from_multistatus(&doc)
    }

    fn resource_url(&self, name: &str) -> String {
        format!("{}/{name}", self.root_url)
    }

    async fn request(
        &mut self,
        method: DavMethod,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, WebDavError> {
        let resp = self.transport.send(method, url, body, &[]).await?;

        match self.status_policy {
            StatusPolicy::RequireSuccess if !resp.head.is_success() => Err(WebDavError::Status {
                method,
                url: url.to_string(),
                status: resp.status(),
            }),
            _ => Ok(resp),
        }
    }
}
