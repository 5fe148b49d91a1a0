use std::io::{BufReader, Read};

use crate::{cnsi::reader::read_document, error::InputError};

/// A parsed classifier document: metadata, attribute schema and raw records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub meta: Meta,
    pub records: Vec<RawRecord>,
}

impl Document {
    pub fn from_reader<R: Read>(r: R) -> Result<Self, InputError> {
        read_document(BufReader::new(r))
    }
}

/// `<simple-classifier>` attributes and its attribute definition lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub name: String,
    pub code: String,
    pub uid: String,
    pub version: i64,
    pub attributes: AttributeDefs,
}

/// The three definition lists as they appear on the wire.
/// `string` and `text` attributes both decode into string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDefs {
    pub string: Vec<AttributeDecl>,
    pub text: Vec<AttributeDecl>,
    pub integer: Vec<AttributeDecl>,
}

impl AttributeDefs {
    pub fn len(&self) -> usize {
        self.string.len() + self.text.len() + self.integer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDecl {
    pub uid: String,
    pub name: String,
}

/// `<record>`: ordered (attribute-ref, value) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub uid: Option<String>,
    pub values: Vec<AttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    pub reference: String,
    pub value: Value,
}

/// Payload of an `<attribute-value>`.
///
/// `Missing` is an `<attribute-value>` element without any payload child,
/// which is different from the pair not being present at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
    String(String),
    #[default]
    Missing,
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// `<text>` and `<string>` payloads are interchangeable.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::String(s) => Some(s),
            _ => None,
        }
    }
}
