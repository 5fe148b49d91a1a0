use std::io::BufRead;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    cnsi::document::{AttributeDecl, AttributeValue, Document, RawRecord, Value},
    constants::*,
    error::InputError,
};

/// Where the reader is in the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Document,
    Classifier,
    Data,
    Record,
    AttributeValue,
    Payload(PayloadTag),
    /// Unknown element: its whole subtree is ignored.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadTag {
    Integer,
    Text,
    String,
}

/// Read one `<document>` element into a [`Document`].
///
/// Reading stops once the document element is closed; trailing content is not inspected.
pub fn read_document<R: BufRead>(r: R) -> Result<Document, InputError> {
    let mut xml = Reader::from_reader(r);
    let mut buf = Vec::new();
    let mut doc = Document::default();
    let mut stack: Vec<(Frame, String)> = Vec::new();
    let mut text = String::new();
    let mut seen_root = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let frame = open(&mut doc, stack.last().map(|(f, _)| *f), &e)?;
                seen_root = true;
                start_payload(frame, &mut text);
                stack.push((frame, local_name(&e)));
            }
            Event::Empty(e) => {
                let frame = open(&mut doc, stack.last().map(|(f, _)| *f), &e)?;
                seen_root = true;
                start_payload(frame, &mut text);
                close(&mut doc, frame, &mut text)?;
                if stack.is_empty() {
                    break;
                }
            }
            Event::End(_) => {
                if let Some((frame, _)) = stack.pop() {
                    close(&mut doc, frame, &mut text)?;
                }
                if stack.is_empty() {
                    break;
                }
            }
            Event::Text(t) => {
                if in_payload(&stack) {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if in_payload(&stack) {
                    text.push_str(std::str::from_utf8(&c)?);
                }
            }
            Event::Eof => {
                if let Some((_, element)) = stack.pop() {
                    return Err(InputError::UnexpectedEof { element });
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(InputError::MissingRoot);
    }
    Ok(doc)
}

/// Children of a payload are skipped, but the text around them still belongs to it.
fn start_payload(frame: Frame, text: &mut String) {
    if matches!(frame, Frame::Payload(_)) {
        text.clear();
    }
}

fn in_payload(stack: &[(Frame, String)]) -> bool {
    matches!(stack.last(), Some((Frame::Payload(_), _)))
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Classify a newly opened element and record whatever its attributes carry.
fn open(doc: &mut Document, parent: Option<Frame>, e: &BytesStart<'_>) -> Result<Frame, InputError> {
    let name = e.local_name();
    let name = name.as_ref();

    let frame = match (parent, name) {
        (None, EL_DOCUMENT) => Frame::Document,
        (None, _) => {
            return Err(InputError::UnexpectedRoot {
                found: local_name(e),
            });
        }
        (Some(Frame::Document), EL_CLASSIFIER) => {
            let meta = &mut doc.meta;
            meta.name = attr(e, ATTR_NAME)?.unwrap_or_default();
            meta.code = attr(e, ATTR_CODE)?.unwrap_or_default();
            meta.uid = attr(e, ATTR_UID)?.unwrap_or_default();
            meta.version = match attr(e, ATTR_VERSION)? {
                Some(v) => parse_int("classifier version", &v)?,
                None => 0,
            };
            Frame::Classifier
        }
        (Some(Frame::Classifier), EL_STRING_ATTRIBUTE | EL_TEXT_ATTRIBUTE | EL_INTEGER_ATTRIBUTE) => {
            let decl = AttributeDecl {
                uid: attr(e, ATTR_UID)?.unwrap_or_default(),
                name: attr(e, ATTR_NAME)?.unwrap_or_default(),
            };
            let defs = &mut doc.meta.attributes;
            match name {
                EL_STRING_ATTRIBUTE => defs.string.push(decl),
                EL_TEXT_ATTRIBUTE => defs.text.push(decl),
                _ => defs.integer.push(decl),
            }
            // Definitions may carry their own children (length, required...), none of which we need.
            Frame::Skip
        }
        (Some(Frame::Document), EL_DATA) => Frame::Data,
        (Some(Frame::Data), EL_RECORD) => {
            doc.records.push(RawRecord {
                uid: attr(e, ATTR_UID)?,
                values: Vec::new(),
            });
            Frame::Record
        }
        (Some(Frame::Record), EL_ATTRIBUTE_VALUE) => {
            let reference = attr(e, ATTR_REF)?.unwrap_or_default();
            if let Some(rec) = doc.records.last_mut() {
                rec.values.push(AttributeValue {
                    reference,
                    value: Value::Missing,
                });
            }
            Frame::AttributeValue
        }
        (Some(Frame::AttributeValue), EL_INTEGER) => Frame::Payload(PayloadTag::Integer),
        (Some(Frame::AttributeValue), EL_TEXT) => Frame::Payload(PayloadTag::Text),
        (Some(Frame::AttributeValue), EL_STRING) => Frame::Payload(PayloadTag::String),
        _ => Frame::Skip,
    };
    Ok(frame)
}

/// Finish an element. Only payload elements carry anything to store.
fn close(doc: &mut Document, frame: Frame, text: &mut String) -> Result<(), InputError> {
    let Frame::Payload(tag) = frame else {
        return Ok(());
    };
    let raw = std::mem::take(text);
    let value = match tag {
        PayloadTag::Integer => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Value::Integer(0)
            } else {
                Value::Integer(parse_int("integer value", trimmed)?)
            }
        }
        PayloadTag::Text => Value::Text(raw),
        PayloadTag::String => Value::String(raw),
    };

    let slot = doc
        .records
        .last_mut()
        .and_then(|rec| rec.values.last_mut());
    // The first payload of an attribute-value wins, whatever the kind of the field
    // bound to it. A later payload of the matching kind is not looked at.
    if let Some(av) = slot {
        if av.value == Value::Missing {
            av.value = value;
        }
    }
    Ok(())
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, InputError> {
    for a in e.attributes() {
        let a = a.map_err(quick_xml::Error::from)?;
        if a.key.local_name().as_ref() == name {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn parse_int(context: &'static str, s: &str) -> Result<i64, InputError> {
    s.trim().parse().map_err(|_| InputError::InvalidInteger {
        context,
        value: s.to_string(),
    })
}
