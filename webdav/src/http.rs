// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP transport with Basic authentication and a session cookie jar.

use std::fmt;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};

use crate::config::{Credentials, WebDavConfig};
use crate::cookie::CookieJar;
use crate::error::WebDavError;
use crate::response::{HttpResponse, ResponseHead};

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Request verbs understood by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DavMethod {
    /// `HEAD`, used to validate the remote root.
    Head,
    /// `GET`.
    Get,
    /// `PUT`.
    Put,
    /// `DELETE`.
    Delete,
    /// `MKCOL`.
    Mkcol,
    /// `PROPFIND`.
    Propfind,
}

impl DavMethod {
    /// Returns the method token as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Mkcol => "MKCOL",
            Self::Propfind => "PROPFIND",
        }
    }

    fn to_method(self) -> Result<Method, WebDavError> {
        match self {
            Self::Head => Ok(Method::HEAD),
            Self::Get => Ok(Method::GET),
            Self::Put => Ok(Method::PUT),
            Self::Delete => Ok(Method::DELETE),
            Self::Mkcol | Self::Propfind => Method::from_bytes(self.as_str().as_bytes())
                .map_err(|e| WebDavError::Config(format!("Invalid method: {e}"))),
        }
    }
}

impl fmt::Display for DavMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Performs one HTTP request/response cycle per call and keeps session state.
///
/// The cookie jar and the last response head are owned by the transport and
/// mutated by [`send`](Self::send), which therefore takes `&mut self`. Share a
/// transport between tasks only behind external synchronisation.
#[derive(Debug)]
pub struct Transport {
    client: Client,
    authorization: HeaderValue,
    cookies: CookieJar,
    last_response: Option<ResponseHead>,
}

impl Transport {
    /// Creates a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the credentials
    /// do not form a valid header value.
    pub fn new(config: &WebDavConfig) -> Result<Self, WebDavError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            authorization: basic_authorization(&config.credentials)?,
            cookies: CookieJar::new(),
            last_response: None,
        })
    }

    /// Returns the session cookies collected so far.
    #[must_use]
    pub const fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Returns the head of the most recent response, if any call succeeded.
    #[must_use]
    pub const fn last_response(&self) -> Option<&ResponseHead> {
        self.last_response.as_ref()
    }

    /// Sends one request and parses the response.
    ///
    /// `extra_headers` are placed after the authorization header and before
    /// the cookie and cache headers. Response `Set-Cookie` headers update the
    /// cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::Transport`] if the request could not be sent or
    /// the response could not be read.
    pub async fn send(
        &mut self,
        method: DavMethod,
        url: &str,
        body: Option<Vec<u8>>,
        extra_headers: &[(&str, &str)],
    ) -> Result<HttpResponse, WebDavError> {
        self.last_response = None;

        let headers = self.request_headers(extra_headers, body.as_ref().map(Vec::len))?;
        let mut req = self.client.request(method.to_method()?, url);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        tracing::debug!(%method, url, "sending request");
        let resp = req.send().await?;

        let lines = head_lines(&resp);
        let head = ResponseHead::parse(lines.iter().map(String::as_str));
        let body: Vec<u8> = resp.bytes().await?.into();
        tracing::debug!(%method, url, status = ?head.status, len = body.len(), "received response");

        for value in head.headers_named("Set-Cookie") {
            self.cookies.store_set_cookie(value);
        }

        self.last_response = Some(head.clone());
        Ok(HttpResponse { head, body })
    }

    /// Assembles request headers in wire order.
    fn request_headers(
        &self,
        extra_headers: &[(&str, &str)],
        body_len: Option<usize>,
    ) -> Result<Vec<(HeaderName, HeaderValue)>, WebDavError> {
        let mut headers = vec![
            (
                reqwest::header::ACCEPT,
                HeaderValue::from_static(ACCEPT),
            ),
            (
                reqwest::header::ACCEPT_LANGUAGE,
                HeaderValue::from_static(ACCEPT_LANGUAGE),
            ),
            (reqwest::header::AUTHORIZATION, self.authorization.clone()),
        ];

        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| WebDavError::Config(format!("Invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| WebDavError::Config(format!("Invalid value for {name}: {e}")))?;
            headers.push((name, value));
        }

        if let Some(cookie) = self.cookies.header_value() {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| WebDavError::Config(format!("Invalid cookie header: {e}")))?;
            headers.push((reqwest::header::COOKIE, value));
        }

        headers.push((
            reqwest::header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ));
        headers.push((
            reqwest::header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        ));
        headers.push((reqwest::header::PRAGMA, HeaderValue::from_static("no-cache")));

        if let Some(len) = body_len {
            headers.push((
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ));
            headers.push((reqwest::header::CONTENT_LENGTH, HeaderValue::from(len)));
        }

        Ok(headers)
    }
}

/// Encodes `Basic <base64(username:password)>` once per transport.
fn basic_authorization(credentials: &Credentials) -> Result<HeaderValue, WebDavError> {
    let token = BASE64.encode(format!("{}:{}", credentials.username, credentials.password));
    let mut value = HeaderValue::from_str(&format!("Basic {token}"))
        .map_err(|e| WebDavError::Config(format!("Invalid credentials: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Renders the response head as raw lines: the status line, then one
/// `name: value` line per header value in arrival order.
fn head_lines(resp: &Response) -> Vec<String> {
    let mut lines = vec![format!("{:?} {}", resp.version(), resp.status())];
    for (name, value) in resp.headers() {
        match value.to_str() {
            Ok(value) => lines.push(format!("{name}: {value}")),
            Err(_) => tracing::debug!(%name, "skipping non-text response header"),
        }
    }
    lines
}
