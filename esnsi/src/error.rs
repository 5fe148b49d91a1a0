use crate::schema::Kind;

/// Handler failures are opaque to the decoder; it only attaches the record position.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by [`crate::decoder::Decoder::decode`] and the classifier constructors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl Error {
    /// The index-building failure behind a handler error, if that is what aborted the decode.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Decode(DecodeError::Handler { source, .. }) => source.downcast_ref(),
            _ => None,
        }
    }
}

/// Target type does not fit the document schema. Raised before any record is read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("struct type expected, got {found}")]
    NotAStruct { found: &'static str },

    #[error("attribute {attribute} not found in classifier")]
    AttributeNotFound { attribute: String },

    #[error(
        "field {field} has type {found}, expected {expected} for attribute {attribute} with Ref {reference}"
    )]
    TypeMismatch {
        field: &'static str,
        found: Kind,
        expected: Kind,
        attribute: String,
        reference: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("reader is nil")]
    ReaderMissing,

    #[error("failed to decode XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to decode XML: expected element <document>, found <{found}>")]
    UnexpectedRoot { found: String },

    #[error("failed to decode XML: document element is missing")]
    MissingRoot,

    #[error("failed to decode XML: unexpected end of input inside <{element}>")]
    UnexpectedEof { element: String },

    #[error("failed to decode XML: invalid integer '{value}' in {context}")]
    InvalidInteger { context: &'static str, value: String },

    #[error("failed to decode XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// A record could not be populated, or the handler refused it.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("integer value for attribute {reference} is not set (record {index})")]
    IntegerNotSet { reference: String, index: usize },

    #[error("string value for attribute {reference} is not set (record {index})")]
    ValueNotSet { reference: String, index: usize },

    #[error("handler error at record {index}: {source}")]
    Handler {
        index: usize,
        #[source]
        source: HandlerError,
    },
}

/// Raised by the index builders of concrete classifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid {scheme} code '{code}'")]
    InvalidCode { scheme: &'static str, code: String },

    #[error("duplicate {scheme} code '{key}'")]
    DuplicateKey { scheme: &'static str, key: String },
}
