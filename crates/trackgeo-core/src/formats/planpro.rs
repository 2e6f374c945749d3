//! # PlanPro Loader
//!
//! Reads a PlanPro XML document into records.
//!
//! Every element becomes a `Record` labeled with its local name (namespace
//! prefix stripped). Attributes are ignored, text is trimmed and unescaped.
//! The store is built from the children of the first `Container` element
//! in document order.

use crate::primitives::CONTAINER_LABEL;
use crate::{Container, Record, TrackError};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a PlanPro document and build a store from its `Container`.
pub fn parse_document(xml: &str) -> Result<Container, TrackError> {
    let root = parse_tree(xml)?;
    let container = find_container(root).ok_or_else(|| {
        TrackError::DeserializationError(format!("no {CONTAINER_LABEL} element in document"))
    })?;

    let store = Container::from_records(container.into_children());
    tracing::info!(
        records = store.record_count(),
        edges = store.edge_count(),
        point_objects = store.point_object_count(),
        "document loaded"
    );
    Ok(store)
}

/// Build the element tree of a whole document.
fn parse_tree(xml: &str) -> Result<Record, TrackError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // Open elements, innermost last.
    let mut open: Vec<Record> = Vec::new();
    let mut root: Option<Record> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            TrackError::DeserializationError(format!(
                "XML error at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(element) => open.push(Record::new(label_of(&element)?)),
            Event::Empty(element) => {
                let record = Record::new(label_of(&element)?);
                attach(&mut open, &mut root, record)?;
            }
            Event::Text(text) => {
                if let Some(current) = open.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| TrackError::DeserializationError(e.to_string()))?;
                    current.append_text(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = open.last_mut() {
                    let bytes = data.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| TrackError::DeserializationError(e.to_string()))?;
                    current.append_text(text.trim());
                }
            }
            Event::End(_) => {
                let record = open.pop().ok_or_else(|| {
                    TrackError::DeserializationError("unbalanced end tag".to_string())
                })?;
                attach(&mut open, &mut root, record)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(TrackError::DeserializationError(format!(
            "unclosed element {}",
            unclosed.label()
        )));
    }
    root.ok_or_else(|| TrackError::DeserializationError("empty document".to_string()))
}

/// Hang a finished element on its parent, or make it the document root.
fn attach(
    open: &mut [Record],
    root: &mut Option<Record>,
    record: Record,
) -> Result<(), TrackError> {
    match open.last_mut() {
        Some(parent) => parent.push_child(record),
        None if root.is_none() => *root = Some(record),
        None => {
            return Err(TrackError::DeserializationError(
                "more than one root element".to_string(),
            ));
        }
    }
    Ok(())
}

fn label_of(element: &BytesStart<'_>) -> Result<String, TrackError> {
    let name = element.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| TrackError::DeserializationError(format!("element name: {e}")))
}

/// First `Container` element in document order.
fn find_container(root: Record) -> Option<Record> {
    let mut pending = vec![root];
    while let Some(record) = pending.pop() {
        if record.label() == CONTAINER_LABEL {
            return Some(record);
        }
        pending.extend(record.into_children().into_iter().rev());
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================
