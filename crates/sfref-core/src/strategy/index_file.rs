//! Structured table-of-contents files.
//!
//! Older documentation sets publish their navigation as an XML file:
//!
//! ```xml
//! <toc>
//!   <tocentry text="Getting Started" href="getting_started.htm">
//!     <tocentry text="Console Basics" href="console_basics.htm"/>
//!   </tocentry>
//! </toc>
//! ```
//!
//! Entries are emitted in pre-order, which is the order they appear in the
//! file, regardless of nesting depth.

use super::{RetrievalStrategy, is_navigable_href, normalize_whitespace};
use crate::{Error, RawLink, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{instrument, trace};

const ROOT_ELEMENT: &[u8] = b"toc";
const ENTRY_ELEMENT: &[u8] = b"tocentry";

/// Parses XML index files.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexFileStrategy;

impl RetrievalStrategy for IndexFileStrategy {
    fn name(&self) -> &'static str {
        "index-file"
    }

    #[instrument(skip_all, fields(xml_len = content.len()))]
    fn parse(&self, content: &str) -> Result<Vec<RawLink>> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut links = Vec::new();
        let mut seen_root = false;
        let mut root_closed = false;

        loop {
            let event = reader.read_event();
            match &event {
                Ok(Event::Start(element) | Event::Empty(element)) => {
                    let name = element.local_name();
                    if !seen_root {
                        if name.as_ref() != ROOT_ELEMENT {
                            return Err(Error::Parse(format!(
                                "index file root is <{}>, expected <toc>",
                                String::from_utf8_lossy(name.as_ref())
                            )));
                        }
                        seen_root = true;
                        root_closed = matches!(event, Ok(Event::Empty(_)));
                        continue;
                    }
                    if name.as_ref() == ENTRY_ELEMENT {
                        if let Some(link) = entry_link(element)? {
                            trace!(title = %link.title, href = %link.href, "index entry");
                            links.push(link);
                        }
                    }
                },
                Ok(Event::End(element)) if element.local_name().as_ref() == ROOT_ELEMENT => {
                    root_closed = true;
                },
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => {
                    return Err(Error::Parse(format!(
                        "malformed index file at byte {}: {e}",
                        reader.error_position()
                    )));
                },
            }
        }

        if !seen_root {
            return Err(Error::Parse("index file has no <toc> element".to_string()));
        }
        if !root_closed {
            return Err(Error::Parse("index file ended before </toc>".to_string()));
        }
        if links.is_empty() {
            return Err(Error::Parse("index file contains no entries".to_string()));
        }
        Ok(links)
    }
}

/// Read the title and href of one `<tocentry>`; `None` when it is not a link.
fn entry_link(element: &BytesStart<'_>) -> Result<Option<RawLink>> {
    let mut text = None;
    let mut title = None;
    let mut href = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::Parse(format!("invalid attribute: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse(format!("invalid attribute value: {e}")))?;
        match attr.key.local_name().as_ref() {
            b"text" => text = Some(normalize_whitespace(&value)),
            b"title" => title = Some(normalize_whitespace(&value)),
            b"href" => href = Some(value.trim().to_string()),
            _ => {},
        }
    }

    let Some(href) = href.filter(|h| is_navigable_href(h)) else {
        return Ok(None);
    };
    let Some(title) = text.filter(|t| !t.is_empty()).or(title).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    Ok(Some(RawLink { title, href }))
}
