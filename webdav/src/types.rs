// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::DateTime;
use jiff::fmt::rfc2822::DateTimeParser;
use jiff::tz::TimeZone;
use jiff::Timestamp;

use crate::error::WebDavError;
use crate::xml::Multistatus;

/// Properties of a single remote resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavProperties {
    /// The resource href as reported by the server.
    pub href: String,
    /// Last modification time, from `getlastmodified`.
    pub modified: Timestamp,
    /// Size in bytes, from `getcontentlength`.
    pub length: u64,
    /// MIME type, from `getcontenttype`.
    pub content_type: String,
}

impl DavProperties {
    /// Decodes the first occurrence of each property in a multistatus document.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::Decode`] if a property is missing, or if the
    /// date or length cannot be parsed.
    pub fn from_multistatus(doc: &Multistatus) -> Result<Self, WebDavError> {
        let href = first(&doc.hrefs, "href")?;
        let modified = first(&doc.last_modified, "getlastmodified")?;
        let length = first(&doc.content_lengths, "getcontentlength")?;
        let content_type = first(&doc.content_types, "getcontenttype")?;

        Ok(Self {
            href: href.to_string(),
            modified: parse_http_date(modified)?,
            length: length.trim().parse().map_err(|e| {
                WebDavError::Decode(format!("Invalid getcontentlength '{length}': {e}"))
            })?,
            content_type: content_type.to_string(),
        })
    }
}

fn first<'a>(values: &'a [String], element: &str) -> Result<&'a str, WebDavError> {
    values
        .first()
        .map(String::as_str)
        .ok_or_else(|| WebDavError::Decode(format!("Missing {element} element")))
}

/// Parses an HTTP date in any of the forms servers send:
///
/// - RFC 2822 / IMF-fixdate: `Tue, 06 Jan 2026 10:00:00 GMT`
/// - RFC 850: `Tuesday, 06-Jan-26 10:00:00 GMT`
/// - asctime: `Tue Jan  6 10:00:00 2026`
///
/// A weekday that disagrees with the date is ignored.
fn parse_http_date(s: &str) -> Result<Timestamp, WebDavError> {
    let s = s.trim();
    let rfc2822 = DateTimeParser::new();
    let invalid =
        |e: jiff::Error| WebDavError::Decode(format!("Invalid getlastmodified '{s}': {e}"));

    let err = match rfc2822.parse_timestamp(s) {
        Ok(ts) => return Ok(ts),
        Err(err) => err,
    };

    if let Some((_, date)) = s.split_once(',') {
        let date = date.trim();
        if let Ok(ts) = rfc2822.parse_timestamp(date) {
            return Ok(ts);
        }
        return parse_utc("%d-%b-%y %H:%M:%S GMT", date).map_err(invalid);
    }

    // asctime: weekday, month, space-padded day, time, year
    let fields: Vec<&str> = s.split_whitespace().collect();
    match fields.as_slice() {
        [_, month, day, time, year] => {
            parse_utc("%b %d %H:%M:%S %Y", &format!("{month} {day:0>2} {time} {year}"))
                .map_err(invalid)
        }
        _ => Err(invalid(err)),
    }
}

fn parse_utc(format: &str, input: &str) -> Result<Timestamp, jiff::Error> {
    Ok(DateTime::strptime(format, input)?
        .to_zoned(TimeZone::UTC)?
        .timestamp())
}
