//! Attribute definitions of one classifier and the lookups the decoder needs.

use core::fmt;
use std::collections::HashMap;

use tracing::warn;

use crate::cnsi::document::{AttributeDefs, Document};

/// Primitive kind of an attribute or of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Integer,
}

impl Kind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "int",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub reference_id: String,
    pub name: String,
    pub kind: Kind,
}

/// Name -> definition index over the merged string, text and integer attribute lists.
///
/// A later definition with an already seen name replaces the earlier one.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    defs: Vec<AttributeDef>,
    by_name: HashMap<String, usize>,
}

impl Schema {
    pub fn new(defs: impl IntoIterator<Item = AttributeDef>) -> Self {
        let mut schema = Self::default();
        for def in defs {
            schema.insert(def);
        }
        schema
    }

    pub fn from_document(doc: &Document) -> Self {
        Self::from_attribute_defs(&doc.meta.attributes)
    }

    pub fn from_attribute_defs(attrs: &AttributeDefs) -> Self {
        let strings = attrs
            .string
            .iter()
            .chain(&attrs.text)
            .map(|a| (a, Kind::String));
        let integers = attrs.integer.iter().map(|a| (a, Kind::Integer));
        Self::new(strings.chain(integers).map(|(a, kind)| AttributeDef {
            reference_id: a.uid.clone(),
            name: a.name.clone(),
            kind,
        }))
    }

    fn insert(&mut self, def: AttributeDef) {
        let pos = self.defs.len();
        if let Some(prev) = self.by_name.insert(def.name.clone(), pos) {
            warn!(
                attribute = %def.name,
                replaced = %self.defs[prev].reference_id,
                by = %def.reference_id,
                "duplicate attribute name in classifier schema"
            );
        }
        self.defs.push(def);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDef> {
        self.by_name.get(name).map(|&i| &self.defs[i])
    }

    /// Definitions in document order, shadowed duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDef> {
        self.defs.iter()
    }

    /// Number of distinct attribute names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(reference_id: &str, name: &str, kind: Kind) -> AttributeDef {
        AttributeDef {
            reference_id: reference_id.into(),
            name: name.into(),
            kind,
        }
    }

    #[test]
    fn lookup_by_name() {
        let schema = Schema::new([
            def("r1", "Code", Kind::String),
            def("r2", "Version", Kind::Integer),
        ]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("Version").map(|d| d.kind), Some(Kind::Integer));
        assert_eq!(schema.get("Code").map(|d| d.reference_id.as_str()), Some("r1"));
        assert!(schema.get("code").is_none());
    }

    #[test]
    fn duplicate_name_last_wins() {
        let schema = Schema::new([
            def("r1", "Code", Kind::String),
            def("r2", "Code", Kind::Integer),
        ]);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.iter().count(), 2);
        let code = schema.get("Code").unwrap();
        assert_eq!(code.reference_id, "r2");
        assert_eq!(code.kind, Kind::Integer);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Kind::String.to_string(), "string");
        assert_eq!(Kind::Integer.to_string(), "int");
    }
}
