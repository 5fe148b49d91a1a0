//! CNSI simple-classifier documents: the wire model and its XML reader.
//!
//! Format: `urn://x-artefacts-nsi-gov-ru/services/cnsi/2.0.0.0`.

pub mod document;
pub mod reader;

pub use document::{AttributeDecl, AttributeDefs, AttributeValue, Document, Meta, RawRecord, Value};
pub use reader::read_document;
