use std::{io::Read, ops::Deref};

use tracing::{debug, warn};

use crate::{
    classifier::Classifier,
    classifiers::{OKATO_SCHEME, resolve},
    code::{self, HierarchicalCode},
    decoder::{Decoder, RecordHandler},
    error::{HandlerError, Result, ValidationError},
    index::{DuplicatePolicy, KeyIndex, MultiIndex},
    parser::record::{Layout, Record},
};

/// All-Russian classifier of administrative-territorial division objects (OKATO).
///
/// <https://esnsi.gosuslugi.ru/classifiers/16270>
///
/// The published registry contains malformed codes (e.g. ";;classifierOkato_75.249.550").
/// Such records are dropped while decoding; they appear neither in the record list
/// nor in any index.
#[derive(Debug, Clone)]
pub struct Okato {
    classifier: Classifier<OkatoRecord>,
    by_code: KeyIndex,
    by_code11: KeyIndex,
    by_region: MultiIndex,
    regions: KeyIndex,
}

/// One OKATO entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OkatoRecord {
    /// Dotted code as published, e.g. "01.201.800".
    pub c: String,
    /// Control number. Example: "1"
    pub k4: String,
    /// Example: "Сельсоветы Алейского р-на"
    pub name: String,
    /// Usually the administrative centre. Example: "с Толстая Дуброва"
    pub additional_data: String,

    // Derived from `c` by [`OkatoRecord::parse_code`].
    /// "01201800"
    pub code: String,
    /// "01201800000"
    pub code11: String,
    pub region: String,
    pub level1: String,
    pub level2: String,
    pub level3: String,
}

impl Record for OkatoRecord {
    fn layout() -> Layout<Self> {
        Layout::<Self>::structure()
            .text("c", "Код", |r, v| r.c = v)
            .text("k4", "КЧ", |r, v| r.k4 = v)
            .text("name", "Наименование", |r, v| r.name = v)
            .text("additional_data", "Дополнительные данные", |r, v| r.additional_data = v)
    }
}

impl OkatoRecord {
    /// Validate the dotted code in `c` and fill the derived fields.
    pub fn parse_code(&mut self) -> Result<(), ValidationError> {
        let parsed = HierarchicalCode::parse_dotted(&self.c).ok_or_else(|| ValidationError::InvalidCode {
            scheme: OKATO_SCHEME,
            code: self.c.clone(),
        })?;
        self.code = parsed.digits;
        self.code11 = parsed.canonical;
        self.region = parsed.region;
        self.level1 = parsed.level1;
        self.level2 = parsed.level2;
        self.level3 = parsed.level3;
        Ok(())
    }

    pub fn is_region(&self) -> bool {
        code::is_region(&self.code)
    }
}

impl Okato {
    pub fn from_reader<R: Read>(r: R) -> Result<Self> {
        let mut indexer = OkatoIndexer::default();
        let classifier = Decoder::<OkatoRecord, _>::new(r).with_record_handler(&mut indexer).decode()?;
        Ok(indexer.finish(classifier))
    }

    /// Record with the given code (digits only, as in [`OkatoRecord::code`]).
    pub fn by_code(&self, code: &str) -> Option<&OkatoRecord> {
        self.by_code.get(code).map(|i| &self.records[i])
    }

    /// Record with the given 11-digit code. Of several codes padding to the same
    /// value, the first one decoded is kept.
    pub fn by_code11(&self, code11: &str) -> Option<&OkatoRecord> {
        self.by_code11.get(code11).map(|i| &self.records[i])
    }

    /// All records of a region (two-digit prefix), region record included.
    pub fn by_region(&self, region: &str) -> Vec<&OkatoRecord> {
        resolve(&self.records, self.by_region.get(region))
    }

    /// The region record itself.
    pub fn region(&self, region: &str) -> Option<&OkatoRecord> {
        self.regions.get(region).map(|i| &self.records[i])
    }

    pub fn regions(&self) -> impl Iterator<Item = &OkatoRecord> {
        self.records.iter().filter(|r| r.is_region())
    }

    pub fn code_index(&self) -> &KeyIndex {
        &self.by_code
    }

    pub fn code11_index(&self) -> &KeyIndex {
        &self.by_code11
    }

    pub fn region_index(&self) -> &MultiIndex {
        &self.by_region
    }

    pub fn region_record_index(&self) -> &KeyIndex {
        &self.regions
    }

    pub fn into_classifier(self) -> Classifier<OkatoRecord> {
        self.classifier
    }
}

impl Deref for Okato {
    type Target = Classifier<OkatoRecord>;

    fn deref(&self) -> &Self::Target {
        &self.classifier
    }
}

/// Builds the indices while the decoder walks the records.
struct OkatoIndexer {
    records: Vec<OkatoRecord>,
    by_code: KeyIndex,
    by_code11: KeyIndex,
    by_region: MultiIndex,
    regions: KeyIndex,
    skipped: usize,
}

impl Default for OkatoIndexer {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_code: KeyIndex::new(OKATO_SCHEME, DuplicatePolicy::Reject),
            by_code11: KeyIndex::new(OKATO_SCHEME, DuplicatePolicy::KeepFirst),
            by_region: MultiIndex::default(),
            regions: KeyIndex::new(OKATO_SCHEME, DuplicatePolicy::Reject),
            skipped: 0,
        }
    }
}

impl RecordHandler<OkatoRecord> for OkatoIndexer {
    fn on_record(&mut self, rec: &mut OkatoRecord) -> Result<(), HandlerError> {
        if let Err(err) = rec.parse_code() {
            warn!(code = %rec.c, name = %rec.name, "{err}, record skipped");
            self.skipped += 1;
            return Ok(());
        }

        let pos = self.records.len();
        self.by_code.insert(rec.code.as_str(), pos)?;
        self.by_code11.insert(rec.code11.as_str(), pos)?;
        self.by_region.push(rec.region.as_str(), pos);
        if rec.is_region() {
            self.regions.insert(rec.code.as_str(), pos)?;
        }
        self.records.push(std::mem::take(rec));
        Ok(())
    }
}

impl OkatoIndexer {
    fn finish(self, mut classifier: Classifier<OkatoRecord>) -> Okato {
        debug!(
            records = self.records.len(),
            skipped = self.skipped,
            regions = self.regions.len(),
            "OKATO indexed"
        );
        classifier.records = self.records;
        Okato {
            classifier,
            by_code: self.by_code,
            by_code11: self.by_code11,
            by_region: self.by_region,
            regions: self.regions,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(c: &str) -> OkatoRecord {
        OkatoRecord {
            c: c.into(),
            ..Default::default()
        }
    }

    #[test]
    fn parse_code_fills_levels() {
        let mut r = record("01.200");
        r.parse_code().unwrap();
        assert_eq!(r.code, "01200");
        assert_eq!(r.code11, "01200000000");
        assert_eq!(r.region, "01");
        assert_eq!(r.level1, "200");
        assert_eq!(r.level2, "");
        assert!(!r.is_region());
    }

    #[test]
    fn only_two_digit_codes_are_regions() {
        let mut r = record("45");
        r.parse_code().unwrap();
        assert!(r.is_region());
        assert!(!record("45").is_region());
    }

    #[test]
    fn parse_code_rejects_garbage() {
        let mut r = record(";;classifierOkato_75.249.550");
        let err = r.parse_code().unwrap_err();
        assert_eq!(err.to_string(), "invalid OKATO code ';;classifierOkato_75.249.550'");
        assert_eq!(r.code, "");
    }

    #[test]
    fn indexer_skips_invalid_and_rejects_duplicates() {
        let mut ix = OkatoIndexer::default();
        ix.on_record(&mut record("01")).unwrap();
        ix.on_record(&mut record("bad")).unwrap();
        ix.on_record(&mut record("01.201")).unwrap();
        assert_eq!(ix.records.len(), 2);
        assert_eq!(ix.skipped, 1);

        let err = ix.on_record(&mut record("01")).unwrap_err();
        assert_eq!(err.to_string(), "duplicate OKATO code '01'");
        assert_eq!(ix.records.len(), 2);
    }

    #[test]
    fn code11_keeps_first_of_colliding_codes() {
        let mut ix = OkatoIndexer::default();
        ix.on_record(&mut record("01")).unwrap();
        ix.on_record(&mut record("01.000")).unwrap();
        assert_eq!(ix.by_code.len(), 2);
        assert_eq!(ix.by_code11.get("01000000000"), Some(0));
    }
}
