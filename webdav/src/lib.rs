// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Minimal `WebDAV` client (RFC 4918) for a single remote collection root.
//!
//! The client authenticates with HTTP Basic credentials, carries session
//! cookies from one request to the next, and decodes multistatus responses
//! into directory listings and property records.

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
#![allow(clippy::single_match_else, clippy::match_bool)]

mod client;
mod config;
mod cookie;
mod error;
mod http;
mod response;
mod types;
mod xml;

pub use crate::client::WebDavClient;
pub use crate::config::{Credentials, StatusPolicy, WebDavConfig};
pub use crate::cookie::CookieJar;
pub use crate::error::WebDavError;
pub use crate::http::{DavMethod, Transport};
pub use crate::response::{HttpResponse, ResponseHead};
pub use crate::types::DavProperties;
pub use crate::xml::Multistatus;
