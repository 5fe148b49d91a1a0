use crate::{error::SchemaError, schema::Kind};

/// A target record type the decoder can populate.
///
/// Implementations describe which attribute each field binds to. Fields left out of
/// the layout keep their `Default` value and are free for the caller's own use.
///
/// ```
/// use esnsi::parser::record::{Layout, Record};
///
/// #[derive(Debug, Default)]
/// struct Region {
///     code: String,
///     name: String,
///     kind: i64,
///     note: String, // filled by a handler, not bound
/// }
///
/// impl Record for Region {
///     fn layout() -> Layout<Self> {
///         Layout::<Self>::structure()
///             .text("code", "RegionCode", |r, v| r.code = v)
///             .text("name", "RegionName", |r, v| r.name = v)
///             .integer("kind", "RegionType", |r, v| r.kind = v)
///     }
/// }
/// ```
pub trait Record: Default {
    /// Called once per decode, before any record is read.
    fn layout() -> Layout<Self>;
}

/// Shape of a target type as seen by the decoder.
pub enum Layout<T> {
    /// A struct with attribute-bound fields, in declaration order.
    Struct(Vec<FieldBinding<T>>),
    /// Anything the decoder cannot populate field by field. Carries the type name.
    Scalar(&'static str),
}

impl<T> Layout<T> {
    /// An empty struct layout, extended with [`Layout::text`] and [`Layout::integer`].
    pub fn structure() -> Self {
        Self::Struct(Vec::new())
    }

    /// Bind a string field to a string or text attribute.
    pub fn text(self, field: &'static str, attribute: &'static str, set: fn(&mut T, String)) -> Self {
        self.bind(FieldBinding {
            field,
            attribute,
            setter: Setter::Text(set),
        })
    }

    /// Bind an integer field to an integer attribute.
    pub fn integer(self, field: &'static str, attribute: &'static str, set: fn(&mut T, i64)) -> Self {
        self.bind(FieldBinding {
            field,
            attribute,
            setter: Setter::Integer(set),
        })
    }

    pub fn bind(self, binding: FieldBinding<T>) -> Self {
        match self {
            Self::Struct(mut fields) => {
                fields.push(binding);
                Self::Struct(fields)
            }
            scalar => scalar,
        }
    }

    /// Bound fields of a struct layout; anything else fails the struct check.
    pub fn into_fields(self) -> Result<Vec<FieldBinding<T>>, SchemaError> {
        match self {
            Self::Struct(fields) => Ok(fields),
            Self::Scalar(found) => Err(SchemaError::NotAStruct { found }),
        }
    }
}

/// One field of the target type and the attribute name it reads from.
pub struct FieldBinding<T> {
    pub field: &'static str,
    pub attribute: &'static str,
    pub setter: Setter<T>,
}

impl<T> Clone for FieldBinding<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            attribute: self.attribute,
            setter: self.setter,
        }
    }
}

/// Typed write access to a field. The variant is the field's kind.
pub enum Setter<T> {
    Text(fn(&mut T, String)),
    Integer(fn(&mut T, i64)),
}

impl<T> Setter<T> {
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Text(_) => Kind::String,
            Self::Integer(_) => Kind::Integer,
        }
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Setter<T> {}
