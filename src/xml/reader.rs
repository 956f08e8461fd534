//! Response document reader.
//!
//! Turns an XML document into a `serde_json::Value` tree using the same shape rules the
//! rest of the SDK relies on:
//!
//! - element with text only -> string (trimmed)
//! - empty element -> `null`
//! - element with children or attributes -> object, attributes become keys
//! - repeated sibling elements -> array, in document order
//! - text next to children/attributes -> stored under [`CONTENT_KEY`]
//!
//! This is where the API's nil / single-object / array ambiguity comes from: one
//! `<Item>` is an object, two are an array, none is absent.

use super::XmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Key holding an element's text when it also has attributes or children.
pub const CONTENT_KEY: &str = "__content__";

#[derive(Debug)]
struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, XmlError> {
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::Syntax {
                position,
                message: e.to_string(),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| XmlError::Syntax {
                    position,
                    message: e.to_string(),
                })?
                .into_owned();
            fields.insert(key, Value::String(value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            fields,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.fields.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut fields = self.fields;
            if !text.is_empty() {
                fields.insert(CONTENT_KEY.to_string(), Value::String(text.to_string()));
            }
            Value::Object(fields)
        };
        (self.name, value)
    }
}

fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name, value);
        }
    }
}

/// Parse a document and return its root element name with the root's value tree.
pub fn parse_document(xml: &str) -> Result<(String, Value), XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            position,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => stack.push(Frame::open(&start, position)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start, position)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| XmlError::Syntax {
                    position,
                    message: "unbalanced closing tag".to_string(),
                })?;
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    // Stray HTML entities (e.g. &nbsp;) are kept verbatim.
                    match text.unescape() {
                        Ok(unescaped) => frame.text.push_str(&unescaped),
                        Err(_) => frame.text.push_str(&String::from_utf8_lossy(&text)),
                    }
                }
            }
            Event::CData(cdata) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Syntax {
            position: reader.buffer_position() as u64,
            message: format!("unclosed element <{}>", open.name),
        });
    }
    root.ok_or(XmlError::EmptyDocument)
}
