use std::{io::Read, ops::Deref};

use tracing::debug;

use crate::{
    classifier::Classifier,
    classifiers::{OKATO_SCHEME, sfr::SfrRecord},
    decoder::{Decoder, RecordHandler},
    error::{HandlerError, Result},
    index::{DuplicatePolicy, KeyIndex},
};

/// SFR client offices where every OKATO area is served by exactly one office.
///
/// Decoding fails with "duplicate OKATO code" as soon as a second office claims
/// an area already taken.
#[derive(Debug, Clone)]
pub struct SfrCo {
    classifier: Classifier<SfrRecord>,
    by_okato: KeyIndex,
}

impl SfrCo {
    pub fn from_reader<R: Read>(r: R) -> Result<Self> {
        let mut indexer = SfrCoIndexer {
            records: Vec::new(),
            by_okato: KeyIndex::new(OKATO_SCHEME, DuplicatePolicy::Reject),
        };
        let mut classifier = Decoder::<SfrRecord, _>::new(r).with_record_handler(&mut indexer).decode()?;
        debug!(
            records = indexer.records.len(),
            areas = indexer.by_okato.len(),
            "SFR_CO offices indexed"
        );
        classifier.records = indexer.records;
        Ok(Self {
            classifier,
            by_okato: indexer.by_okato,
        })
    }

    pub fn by_okato(&self, okato: &str) -> Option<&SfrRecord> {
        self.by_okato.get(okato).map(|i| &self.records[i])
    }

    pub fn okato_index(&self) -> &KeyIndex {
        &self.by_okato
    }

    pub fn into_classifier(self) -> Classifier<SfrRecord> {
        self.classifier
    }
}

impl Deref for SfrCo {
    type Target = Classifier<SfrRecord>;

    fn deref(&self) -> &Self::Target {
        &self.classifier
    }
}

struct SfrCoIndexer {
    records: Vec<SfrRecord>,
    by_okato: KeyIndex,
}

impl RecordHandler<SfrRecord> for SfrCoIndexer {
    fn on_record(&mut self, rec: &mut SfrRecord) -> Result<(), HandlerError> {
        rec.parse_okato_areas()?;
        let pos = self.records.len();
        for area in &rec.okato_areas {
            self.by_okato.insert(area.as_str(), pos)?;
        }
        self.records.push(std::mem::take(rec));
        Ok(())
    }
}
