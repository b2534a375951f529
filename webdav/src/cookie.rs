// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Session cookie store.

/// Session cookies keyed by name, in first-seen order.
///
/// Expiry, path and domain attributes are not tracked: every stored cookie
/// is sent with every request against the remote root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cookies: Vec::new(),
        }
    }

    /// Stores a cookie, replacing the value of an existing cookie with the same name.
    ///
    /// A replaced cookie keeps its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.cookies.push((name, value)),
        }
    }

    /// Returns the value stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of stored cookies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if no cookie has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterates over `(name, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Updates the jar from a `Set-Cookie` header value.
    ///
    /// Only the leading `name=value` segment is honoured; attributes such as
    /// `Path` or `Expires` are ignored. Returns `false` if the value does not
    /// start with a non-empty name and value.
    pub fn store_set_cookie(&mut self, header_value: &str) -> bool {
        match parse_set_cookie(header_value) {
            Some((name, value)) => {
                tracing::trace!(name, "storing session cookie");
                self.set(name, value);
                true
            }
            None => false,
        }
    }

    /// Builds the `Cookie` request header value, or `None` if the jar is empty.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let pairs: Vec<String> = self.iter().map(|(n, v)| format!("{n}={v}")).collect();
        Some(pairs.join("; "))
    }
}

fn parse_set_cookie(header_value: &str) -> Option<(&str, &str)> {
    let (name, rest) = header_value.split_once('=')?;
    let value = rest.split(';').next().unwrap_or_default();
    (!name.is_empty() && !value.is_empty()).then_some((name, value))
}
