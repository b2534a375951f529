// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Multistatus decoding for PROPFIND responses.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};

use crate::error::WebDavError;

/// Elements of interest in a multistatus body, matched by local name in any
/// namespace.
const HREF: &[u8] = b"href";
const GET_LAST_MODIFIED: &[u8] = b"getlastmodified";
const GET_CONTENT_LENGTH: &[u8] = b"getcontentlength";
const GET_CONTENT_TYPE: &[u8] = b"getcontenttype";

/// Text of the `WebDAV` elements found in a multistatus document, each list
/// in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multistatus {
    /// `href` element texts.
    pub hrefs: Vec<String>,
    /// `getlastmodified` element texts.
    pub last_modified: Vec<String>,
    /// `getcontentlength` element texts.
    pub content_lengths: Vec<String>,
    /// `getcontenttype` element texts.
    pub content_types: Vec<String>,
}

impl Multistatus {
    /// Parses a multistatus body.
    ///
    /// An empty body yields an empty document. Namespaces are not checked.
    /// Element text is trimmed after entity and character references are
    /// resolved.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::Xml`] if the body is not well-formed XML.
    pub fn from_xml(xml: &[u8]) -> Result<Self, WebDavError> {
        let mut reader = quick_xml::Reader::from_reader(xml);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = true;

        let mut doc = Self::default();
        let mut depth = 0usize;
        // Element being captured, its depth and the text seen so far
        let mut capture: Option<(&'static [u8], usize, String)> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    depth += 1;
                    if capture.is_none() {
                        capture = tracked(e.name().local_name().into_inner())
                            .map(|name| (name, depth, String::new()));
                    }
                }
                Event::Empty(ref e) if capture.is_none() => {
                    if let Some(name) = tracked(e.name().local_name().into_inner()) {
                        doc.push(name, String::new());
                    }
                }
                Event::Text(ref e) => {
                    if let Some((_, _, text)) = capture.as_mut() {
                        text.push_str(&e.decode().map_err(quick_xml::Error::from)?);
                    }
                }
                Event::GeneralRef(ref e) => {
                    if let Some((_, _, text)) = capture.as_mut() {
                        resolve_reference(e, text)?;
                    }
                }
                Event::CData(ref e) => {
                    if let Some((_, _, text)) = capture.as_mut() {
                        text.push_str(&e.decode().map_err(quick_xml::Error::from)?);
                    }
                }
                Event::End(_) => {
                    if let Some((name, at, text)) = capture.take() {
                        if at == depth {
                            doc.push(name, text.trim().to_string());
                        } else {
                            capture = Some((name, at, text));
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => {
                    if depth > 0 {
                        return Err(WebDavError::Xml(
                            "Unexpected end of document".to_string(),
                        ));
                    }
                    break;
                }
                _ => {}
            }
        }

        Ok(doc)
    }

    fn push(&mut self, name: &[u8], text: String) {
        match name {
            HREF => self.hrefs.push(text),
            GET_LAST_MODIFIED => self.last_modified.push(text),
            GET_CONTENT_LENGTH => self.content_lengths.push(text),
            GET_CONTENT_TYPE => self.content_types.push(text),
            _ => {}
        }
    }
}

/// Appends the text of `&name;` or `&#..;` to `text`.
fn resolve_reference(reference: &BytesRef<'_>, text: &mut String) -> Result<(), WebDavError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        text.push(ch);
        return Ok(());
    }

    let name = reference.decode().map_err(quick_xml::Error::from)?;
    let resolved = resolve_predefined_entity(&name)
        .ok_or_else(|| WebDavError::Xml(format!("Unknown entity &{name};")))?;
    text.push_str(resolved);
    Ok(())
}

fn tracked(local_name: &[u8]) -> Option<&'static [u8]> {
    [HREF, GET_LAST_MODIFIED, GET_CONTENT_LENGTH, GET_CONTENT_TYPE]
        .into_iter()
        .find(|name| *name == local_name)
}
