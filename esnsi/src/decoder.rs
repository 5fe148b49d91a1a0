use std::io::Read;

use tracing::{debug, trace};

use crate::{
    classifier::Classifier,
    cnsi::document::Document,
    error::{DecodeError, HandlerError, InputError, Result},
    parser::{
        record::{FieldBinding, Record},
        registry::BindingTable,
    },
    schema::Schema,
};

/// Receives every decoded record instead of the classifier's record list.
pub trait RecordHandler<T> {
    /// Returning an error aborts the decode.
    fn on_record(&mut self, rec: &mut T) -> Result<(), HandlerError>;
}

impl<T, H: RecordHandler<T> + ?Sized> RecordHandler<T> for &mut H {
    fn on_record(&mut self, rec: &mut T) -> Result<(), HandlerError> {
        (**self).on_record(rec)
    }
}

struct FnHandler<F>(F);

impl<T, F> RecordHandler<T> for FnHandler<F>
where
    F: FnMut(&mut T) -> Result<(), HandlerError>,
{
    fn on_record(&mut self, rec: &mut T) -> Result<(), HandlerError> {
        (self.0)(rec)
    }
}

/// Decoder of CNSI simple classifiers into records of type `T`.
///
/// Without a handler, decoded records are collected into [`Classifier::records`].
/// With one, each record is passed to the handler and the list is left empty;
/// the handler decides what to keep.
pub struct Decoder<'h, T, R> {
    reader: Option<R>,
    handler: Option<Box<dyn RecordHandler<T> + 'h>>,
}

impl<T, R> Default for Decoder<'_, T, R> {
    /// A decoder with no input attached. Decoding it fails with [`InputError::ReaderMissing`].
    fn default() -> Self {
        Self {
            reader: None,
            handler: None,
        }
    }
}

impl<'h, T: Record, R: Read> Decoder<'h, T, R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            handler: None,
        }
    }

    /// Route records through `f`. Must be set before [`Decoder::decode`].
    pub fn with_handler<F>(self, f: F) -> Self
    where
        F: FnMut(&mut T) -> Result<(), HandlerError> + 'h,
    {
        self.with_record_handler(FnHandler(f))
    }

    pub fn with_record_handler<H>(mut self, h: H) -> Self
    where
        H: RecordHandler<T> + 'h,
    {
        self.handler = Some(Box::new(h));
        self
    }

    /// Read the document and decode it.
    ///
    /// The target layout is checked first, then the reader, then the document;
    /// records are only touched once every bound field matches the schema.
    pub fn decode(mut self) -> Result<Classifier<T>> {
        let fields = T::layout().into_fields()?;
        let reader = self.reader.take().ok_or(InputError::ReaderMissing)?;
        let doc = Document::from_reader(reader)?;
        self.unmarshal(&fields, doc)
    }

    /// Decode an already parsed document. The attached reader, if any, is not read.
    pub fn decode_document(self, doc: Document) -> Result<Classifier<T>> {
        let fields = T::layout().into_fields()?;
        self.unmarshal(&fields, doc)
    }

    fn unmarshal(self, fields: &[FieldBinding<T>], doc: Document) -> Result<Classifier<T>> {
        let schema = Schema::from_document(&doc);
        let table = BindingTable::new(fields, &schema)?;

        let Document { meta, records } = doc;
        debug!(
            code = %meta.code,
            version = meta.version,
            attributes = schema.len(),
            bound = table.len(),
            records = records.len(),
            "decoding classifier"
        );

        let mut classifier = Classifier {
            name: meta.name,
            code: meta.code,
            uid: meta.uid,
            version: meta.version,
            records: Vec::new(),
        };

        match self.handler {
            None => {
                classifier.records.reserve(records.len());
                for (i, raw) in records.into_iter().enumerate() {
                    let mut rec = T::default();
                    table.apply(&mut rec, raw, i)?;
                    classifier.records.push(rec);
                }
            }
            Some(mut handler) => {
                for (i, raw) in records.into_iter().enumerate() {
                    let mut rec = T::default();
                    table.apply(&mut rec, raw, i)?;
                    trace!(index = i, "dispatching record to handler");
                    handler
                        .on_record(&mut rec)
                        .map_err(|source| DecodeError::Handler { index: i, source })?;
                }
            }
        }

        debug!(code = %classifier.code, kept = classifier.records.len(), "classifier decoded");
        Ok(classifier)
    }
}
