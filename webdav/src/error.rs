// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error as _;
use std::path::PathBuf;

use crate::http::DavMethod;

/// `WebDAV` client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum WebDavError {
    /// The remote root did not answer `HEAD` with `200`.
    #[error("Remote root {url} rejected validation: {}", display_status(.status.as_ref()))]
    Initialization {
        /// The remote root URL.
        url: String,
        /// Status of the `HEAD` response, if one was parsed.
        status: Option<u16>,
    },

    /// The request could not be transmitted or no response was received.
    #[error("Transport error: {message}")]
    Transport {
        /// Message from the underlying HTTP stack.
        message: String,
        /// Operating system error code, when the failure originated there.
        code: Option<i32>,
    },

    /// Local file to upload does not exist or is not a regular file.
    #[error("File not found: '{}'", .0.display())]
    NotFound(PathBuf),

    /// An expected property is missing or malformed in a PROPFIND response.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A multistatus body could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),

    /// A non-2xx response under [`StatusPolicy::RequireSuccess`](crate::StatusPolicy).
    #[error("{method} {url} returned {}", display_status(.status.as_ref()))]
    Status {
        /// Verb of the failed request.
        method: DavMethod,
        /// Target URL of the failed request.
        url: String,
        /// Response status, if one was parsed.
        status: Option<u16>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_status(status: Option<&u16>) -> String {
    status.map_or_else(|| "no status".to_string(), |s| format!("status {s}"))
}

impl From<reqwest::Error> for WebDavError {
    fn from(e: reqwest::Error) -> Self {
        // Find the OS error code buried in hyper/io sources, if any
        let mut code = None;
        let mut source = e.source();
        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<std::io::Error>() {
                code = io.raw_os_error();
                break;
            }
            source = err.source();
        }

        Self::Transport {
            message: e.to_string(),
            code,
        }
    }
}

impl From<quick_xml::Error> for WebDavError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}
