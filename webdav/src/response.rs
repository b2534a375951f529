// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP response head parsing.

/// Status and headers of one HTTP response.
///
/// Heads built by [`Transport`](crate::Transport) come from reqwest's header
/// map, which groups values by name: values of one header keep their arrival
/// order, but the interleaving of different header names is not preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code from the first status line, if any.
    pub status: Option<u16>,
    /// Header pairs in arrival order. Duplicate names are preserved.
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// Parses raw response head lines.
    ///
    /// The first line shaped like `HTTP/1.1 200 OK` sets the status. Every
    /// other line of the form `name: value` becomes a header pair; anything
    /// else is ignored.
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut head = Self::default();

        for line in lines {
            if let Some((name, value)) = parse_header_line(line) {
                head.headers.push((name.to_string(), value.to_string()));
            } else if let Some(status) = parse_status_line(line) {
                head.status.get_or_insert(status);
            }
        }

        head
    }

    /// Returns the first value of the header `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over every value of the header `name`, compared case-insensitively.
    pub fn headers_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if a status was parsed and it is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

/// One complete HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status and headers.
    pub head: ResponseHead,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Shorthand for `self.head.status`.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.head.status
    }
}

/// Splits `name: value` at the first colon. The name must be non-empty, the
/// colon followed by a space and the value non-empty.
fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.split_once(':')?;
    let value = rest.strip_prefix(' ')?;
    (!name.is_empty() && !value.is_empty()).then_some((name, value))
}

/// Matches `HTTP/<digit>.<digit> <code>` at the start of the line.
fn parse_status_line(line: &str) -> Option<u16> {
    let rest = line.strip_prefix("HTTP/")?;
    let mut chars = rest.chars();
    let is_version = matches!(
        (chars.next(), chars.next(), chars.next(), chars.next()),
        (Some(major), Some('.'), Some(minor), Some(' '))
            if major.is_ascii_digit() && minor.is_ascii_digit()
    );
    if !is_version {
        return None;
    }

    let code: String = chars.take_while(char::is_ascii_digit).collect();
    code.parse().ok()
}
