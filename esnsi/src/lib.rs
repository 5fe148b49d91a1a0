//! Decoder for ESNSI / CNSI simple-classifier XML exports.
//!
//! A target record type describes which classifier attributes it wants through
//! [`parser::record::Record`]; [`decoder::Decoder`] checks that description against
//! the schema declared in the document and fills one value per `<record>`.
//! [`classifiers`] builds indexed lookups on top for a few well-known registries.

pub mod classifier;
pub mod classifiers;
pub mod cnsi;
pub mod code;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod index;
pub mod parser;
pub mod schema;

pub use classifier::Classifier;
pub use decoder::{Decoder, RecordHandler};
pub use error::{Error, HandlerError, Result};
pub use parser::record::{Layout, Record};
