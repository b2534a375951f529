// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// HTTP Basic credentials.
#[derive(Clone, Default, serde::Deserialize)]
pub struct Credentials {
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How verb operations treat a transmitted response with a non-2xx status.
///
/// Construction always requires `200` from the root `HEAD`, whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
pub enum StatusPolicy {
    /// Return the result regardless of status; inspect
    /// [`WebDavClient::last_response`](crate::WebDavClient::last_response) when it matters.
    #[serde(rename = "permissive")]
    #[default]
    Permissive,
    /// Fail with [`WebDavError::Status`](crate::WebDavError::Status) on any non-2xx status.
    #[serde(rename = "require-success")]
    RequireSuccess,
}

/// `WebDAV` client configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct WebDavConfig {
    /// URL of the remote collection root, e.g. `https://dav.example.com/remote.php/webdav`.
    pub root_url: String,
    /// Basic authentication credentials.
    #[serde(default)]
    pub credentials: Credentials,
    /// Request timeout in seconds. No timeout is applied when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Handling of non-2xx responses to verb operations.
    #[serde(default)]
    pub status_policy: StatusPolicy,
}

fn default_user_agent() -> String {
    concat!("davlite/", env!("CARGO_PKG_VERSION")).to_string()
}

impl WebDavConfig {
    /// Creates a configuration for `root_url` with default settings.
    #[must_use]
    pub fn new(root_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            root_url: root_url.into(),
            credentials,
            ..Default::default()
        }
    }
}

impl Default for WebDavConfig {
    fn default() -> Self {
        Self {
            root_url: String::new(),
            credentials: Credentials::default(),
            timeout_secs: None,
            user_agent: default_user_agent(),
            status_policy: StatusPolicy::default(),
        }
    }
}
