use std::collections::HashMap;

use crate::{
    cnsi::document::RawRecord,
    error::{DecodeError, SchemaError},
    parser::record::{FieldBinding, Setter},
    schema::Schema,
};

/// Attribute reference -> setters, resolved once per decode against the document schema.
pub struct BindingTable<T> {
    by_reference: HashMap<String, Vec<Setter<T>>>,
}

impl<T> BindingTable<T> {
    /// Check every binding against `schema` and index it by attribute reference.
    ///
    /// Fails on the first binding whose attribute is missing or has a different kind.
    pub fn new(fields: &[FieldBinding<T>], schema: &Schema) -> Result<Self, SchemaError> {
        let mut by_reference: HashMap<String, Vec<Setter<T>>> = HashMap::new();
        for f in fields {
            let def = schema
                .get(f.attribute)
                .ok_or_else(|| SchemaError::AttributeNotFound {
                    attribute: f.attribute.to_string(),
                })?;
            let found = f.setter.kind();
            if found != def.kind {
                return Err(SchemaError::TypeMismatch {
                    field: f.field,
                    found,
                    expected: def.kind,
                    attribute: def.name.clone(),
                    reference: def.reference_id.clone(),
                });
            }
            by_reference
                .entry(def.reference_id.clone())
                .or_default()
                .push(f.setter);
        }
        Ok(Self { by_reference })
    }

    /// Number of distinct attribute references with at least one bound field.
    pub fn len(&self) -> usize {
        self.by_reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_reference.is_empty()
    }

    /// Write the values of `raw` into `target`.
    ///
    /// Pairs for unbound references are ignored. Bound fields whose reference does
    /// not appear in `raw` are left untouched.
    pub fn apply(&self, target: &mut T, raw: RawRecord, index: usize) -> Result<(), DecodeError> {
        for av in raw.values {
            let Some(setters) = self.by_reference.get(&av.reference) else {
                continue;
            };
            for setter in setters {
                match *setter {
                    Setter::Integer(set) => {
                        let v = av.value.as_integer().ok_or_else(|| DecodeError::IntegerNotSet {
                            reference: av.reference.clone(),
                            index,
                        })?;
                        set(target, v);
                    }
                    Setter::Text(set) => {
                        let v = av.value.as_str().ok_or_else(|| DecodeError::ValueNotSet {
                            reference: av.reference.clone(),
                            index,
                        })?;
                        set(target, v.to_string());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cnsi::document::{AttributeValue, Value},
        parser::record::{Layout, Record},
        schema::{AttributeDef, Kind},
    };

    #[derive(Debug, Default, PartialEq)]
    struct Row {
        code: String,
        alias: String,
        size: i64,
        untouched: String,
    }

    impl Record for Row {
        fn layout() -> Layout<Self> {
            Layout::<Self>::structure()
                .text("code", "Code", |r, v| r.code = v)
                .text("alias", "Code", |r, v| r.alias = v)
                .integer("size", "Size", |r, v| r.size = v)
        }
    }

    fn schema() -> Schema {
        Schema::new([
            AttributeDef {
                reference_id: "c".into(),
                name: "Code".into(),
                kind: Kind::String,
            },
            AttributeDef {
                reference_id: "s".into(),
                name: "Size".into(),
                kind: Kind::Integer,
            },
        ])
    }

    fn raw(values: &[(&str, Value)]) -> RawRecord {
        RawRecord {
            uid: None,
            values: values
                .iter()
                .map(|(r, v)| AttributeValue {
                    reference: r.to_string(),
                    value: v.clone(),
                })
                .collect(),
        }
    }

    fn table() -> BindingTable<Row> {
        BindingTable::new(&Row::layout().into_fields().unwrap(), &schema()).unwrap()
    }

    #[test]
    fn populates_bound_fields() {
        let mut row = Row::default();
        let rec = raw(&[
            ("c", Value::Text("01".into())),
            ("s", Value::Integer(5)),
            ("unknown", Value::Missing),
        ]);
        table().apply(&mut row, rec, 0).unwrap();
        assert_eq!(
            row,
            Row {
                code: "01".into(),
                alias: "01".into(),
                size: 5,
                untouched: String::new(),
            }
        );
    }

    #[test]
    fn absent_pairs_keep_zero_values() {
        let mut row = Row::default();
        table().apply(&mut row, raw(&[]), 0).unwrap();
        assert_eq!(row, Row::default());
    }

    #[test]
    fn missing_integer_payload() {
        let mut row = Row::default();
        let err = table()
            .apply(&mut row, raw(&[("s", Value::Missing)]), 3)
            .unwrap_err();
        assert!(matches!(err, DecodeError::IntegerNotSet { ref reference, index: 3 } if reference == "s"));
    }

    #[test]
    fn wrong_tag_for_string_field() {
        let mut row = Row::default();
        let err = table()
            .apply(&mut row, raw(&[("c", Value::Integer(1))]), 0)
            .unwrap_err();
        assert!(matches!(err, DecodeError::ValueNotSet { .. }));
    }

    #[test]
    fn unknown_attribute() {
        let fields = Layout::<Row>::structure()
            .text("code", "Nope", |r, v| r.code = v)
            .into_fields()
            .unwrap();
        let err = BindingTable::new(&fields, &schema()).err().unwrap();
        assert_eq!(err.to_string(), "attribute Nope not found in classifier");
    }

    #[test]
    fn kind_mismatch() {
        let fields = Layout::<Row>::structure()
            .text("size", "Size", |r, v| r.alias = v)
            .into_fields()
            .unwrap();
        let err = BindingTable::new(&fields, &schema()).err().unwrap();
        assert_eq!(
            err.to_string(),
            "field size has type string, expected int for attribute Size with Ref s"
        );
    }
}
