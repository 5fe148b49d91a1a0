use std::{io::Read, ops::Deref};

use tracing::debug;

use crate::{
    classifier::Classifier,
    classifiers::{OKATO_SCHEME, resolve},
    code::{canonical, prefix, split_plain_list},
    decoder::{Decoder, RecordHandler},
    error::{HandlerError, Result, ValidationError},
    index::{DuplicatePolicy, KeyIndex, MultiIndex},
    parser::record::{Layout, Record},
};

/// Client offices of the Social Fund of Russia (SFR_CO).
///
/// <https://esnsi.gosuslugi.ru/classifiers/10991>
///
/// One office may serve several OKATO areas and one area may be served by several
/// offices. In that case [`Sfr::by_okato`] returns the office decoded last.
#[derive(Debug, Clone)]
pub struct Sfr {
    classifier: Classifier<SfrRecord>,
    by_okato: KeyIndex,
    by_okato11: MultiIndex,
    by_okato8: MultiIndex,
    by_okato5: MultiIndex,
    by_okato2: MultiIndex,
}

/// One client office.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfrRecord {
    /// Example: 1831
    pub coid: i64,
    /// Example: "SFR_CO_1831_1"
    pub auto_key: String,
    /// Territorial body code. Example: "210"
    pub to_sfr_code: String,
    /// Example: "013"
    pub region_code: String,
    /// Example: "Республика Татарстан"
    pub region_name: String,
    pub division_code: String,
    pub office_code: String,
    /// Example: "г. Набережные Челны"
    pub office_district_name: String,
    /// Example: "Клиентская служба СФР в г. Набережные Челны (пр-кт Мира)"
    pub to_sfr_name: String,
    pub office_type: i64,
    pub predecessor: i64,
    pub address: String,
    /// OKATO of the office itself. Example: "92430000000"
    pub okato: String,
    /// Served areas as published, comma separated. Example: "92430,92431"
    pub okato_area: String,
    pub oktmo: String,
    pub oktmo_area: String,
    pub email: String,
    pub phone: String,
    pub latitude: String,
    pub longitude: String,
    /// Example: "Пн-Пт: с 8:00 до 17:00, Сб: с 8:00 до 15:45, Вс - выходной"
    pub working_time: String,
    /// Example: "UTC+03:00"
    pub utc: String,
    /// Offset from Moscow time, hours.
    pub msk: i64,
    pub tofss: String,

    /// `okato_area` split and validated by [`SfrRecord::parse_okato_areas`].
    pub okato_areas: Vec<String>,
}

impl Record for SfrRecord {
    fn layout() -> Layout<Self> {
        Layout::<Self>::structure()
            .integer("coid", "COID", |r, v| r.coid = v)
            .text("auto_key", "autokey", |r, v| r.auto_key = v)
            .text("to_sfr_code", "ToSfrCode", |r, v| r.to_sfr_code = v)
            .text("region_code", "RegionCode", |r, v| r.region_code = v)
            .text("region_name", "RegionName", |r, v| r.region_name = v)
            .text("division_code", "DivisionCode", |r, v| r.division_code = v)
            .text("office_code", "OfficeCode", |r, v| r.office_code = v)
            .text("office_district_name", "OfficeDistrictName", |r, v| r.office_district_name = v)
            .text("to_sfr_name", "ToSfrName", |r, v| r.to_sfr_name = v)
            .integer("office_type", "OfficeType", |r, v| r.office_type = v)
            .integer("predecessor", "Predecessor", |r, v| r.predecessor = v)
            .text("address", "Address", |r, v| r.address = v)
            .text("okato", "OKATO", |r, v| r.okato = v)
            .text("okato_area", "OKATO_Area", |r, v| r.okato_area = v)
            .text("oktmo", "OKTMO", |r, v| r.oktmo = v)
            .text("oktmo_area", "OKTMO_Area", |r, v| r.oktmo_area = v)
            .text("email", "Email", |r, v| r.email = v)
            .text("phone", "Phone", |r, v| r.phone = v)
            .text("latitude", "Latitude", |r, v| r.latitude = v)
            .text("longitude", "Longitude", |r, v| r.longitude = v)
            .text("working_time", "WorkingTime", |r, v| r.working_time = v)
            .text("utc", "UTC", |r, v| r.utc = v)
            .integer("msk", "MSK", |r, v| r.msk = v)
            .text("tofss", "TOFSS", |r, v| r.tofss = v)
    }
}

impl SfrRecord {
    /// Split `okato_area` into `okato_areas`. Empty tokens are skipped.
    pub fn parse_okato_areas(&mut self) -> Result<(), ValidationError> {
        self.okato_areas = split_plain_list(&self.okato_area, OKATO_SCHEME)?;
        Ok(())
    }
}

impl Sfr {
    pub fn from_reader<R: Read>(r: R) -> Result<Self> {
        let mut indexer = SfrIndexer::default();
        let classifier = Decoder::<SfrRecord, _>::new(r).with_record_handler(&mut indexer).decode()?;
        Ok(indexer.finish(classifier))
    }

    /// Office serving the area, by code as published ("92430" or "92430000000").
    pub fn by_okato(&self, okato: &str) -> Option<&SfrRecord> {
        self.by_okato.get(okato).map(|i| &self.records[i])
    }

    /// Offices by 11-digit code. Only the first office listing a given canonical
    /// code is kept.
    pub fn by_okato11(&self, okato11: &str) -> Vec<&SfrRecord> {
        resolve(&self.records, self.by_okato11.get(okato11))
    }

    /// Offices by the first 8 digits of a canonical code, e.g. "92430000".
    pub fn by_okato8(&self, okato8: &str) -> Vec<&SfrRecord> {
        resolve(&self.records, self.by_okato8.get(okato8))
    }

    /// Offices by the first 5 digits of a canonical code, e.g. "92430".
    pub fn by_okato5(&self, okato5: &str) -> Vec<&SfrRecord> {
        resolve(&self.records, self.by_okato5.get(okato5))
    }

    /// Offices by region, e.g. "92".
    pub fn by_okato2(&self, okato2: &str) -> Vec<&SfrRecord> {
        resolve(&self.records, self.by_okato2.get(okato2))
    }

    pub fn okato_index(&self) -> &KeyIndex {
        &self.by_okato
    }

    pub fn okato11_index(&self) -> &MultiIndex {
        &self.by_okato11
    }

    pub fn okato8_index(&self) -> &MultiIndex {
        &self.by_okato8
    }

    pub fn okato5_index(&self) -> &MultiIndex {
        &self.by_okato5
    }

    pub fn okato2_index(&self) -> &MultiIndex {
        &self.by_okato2
    }

    pub fn into_classifier(self) -> Classifier<SfrRecord> {
        self.classifier
    }
}

impl Deref for Sfr {
    type Target = Classifier<SfrRecord>;

    fn deref(&self) -> &Self::Target {
        &self.classifier
    }
}

struct SfrIndexer {
    records: Vec<SfrRecord>,
    by_okato: KeyIndex,
    by_okato11: MultiIndex,
    by_okato8: MultiIndex,
    by_okato5: MultiIndex,
    by_okato2: MultiIndex,
}

impl Default for SfrIndexer {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_okato: KeyIndex::new(OKATO_SCHEME, DuplicatePolicy::KeepLast),
            by_okato11: MultiIndex::default(),
            by_okato8: MultiIndex::default(),
            by_okato5: MultiIndex::default(),
            by_okato2: MultiIndex::default(),
        }
    }
}

impl RecordHandler<SfrRecord> for SfrIndexer {
    fn on_record(&mut self, rec: &mut SfrRecord) -> Result<(), HandlerError> {
        rec.parse_okato_areas()?;

        let pos = self.records.len();
        for area in &rec.okato_areas {
            self.by_okato.insert(area.as_str(), pos)?;
            let okato11 = canonical(area);
            self.by_okato8.push(prefix(&okato11, 8), pos);
            self.by_okato5.push(prefix(&okato11, 5), pos);
            self.by_okato2.push(prefix(&okato11, 2), pos);
            self.by_okato11.push_first(okato11, pos);
        }
        self.records.push(std::mem::take(rec));
        Ok(())
    }
}

impl SfrIndexer {
    fn finish(self, mut classifier: Classifier<SfrRecord>) -> Sfr {
        debug!(
            records = self.records.len(),
            areas = self.by_okato.len(),
            regions = self.by_okato2.len(),
            "SFR offices indexed"
        );
        classifier.records = self.records;
        Sfr {
            classifier,
            by_okato: self.by_okato,
            by_okato11: self.by_okato11,
            by_okato8: self.by_okato8,
            by_okato5: self.by_okato5,
            by_okato2: self.by_okato2,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn office(coid: i64, areas: &str) -> SfrRecord {
        SfrRecord {
            coid,
            okato_area: areas.into(),
            ..Default::default()
        }
    }

    #[test]
    fn areas_are_split_and_trimmed() {
        let mut r = office(1, " 92430, 92431 ,,");
        r.parse_okato_areas().unwrap();
        assert_eq!(r.okato_areas, vec!["92430", "92431"]);
    }

    #[test]
    fn shared_area_policies() {
        let mut ix = SfrIndexer::default();
        ix.on_record(&mut office(1, "92430")).unwrap();
        ix.on_record(&mut office(2, "92430,92431")).unwrap();

        assert_eq!(ix.by_okato.get("92430"), Some(1));
        assert_eq!(ix.by_okato11.get("92430000000"), &[0]);
        assert_eq!(ix.by_okato5.get("92430"), &[0, 1]);
        assert_eq!(ix.by_okato2.get("92"), &[0, 1, 1]);
        assert_eq!(ix.records[1].okato_areas, vec!["92430", "92431"]);
    }

    #[test]
    fn invalid_area_token() {
        let mut ix = SfrIndexer::default();
        let err = ix.on_record(&mut office(1, "92430,92X30")).unwrap_err();
        assert_eq!(err.to_string(), "invalid OKATO code '92X30'");
        assert!(ix.records.is_empty());
        assert!(ix.by_okato.is_empty());
    }

    #[test]
    fn office_without_areas_is_kept() {
        let mut ix = SfrIndexer::default();
        ix.on_record(&mut office(7, "")).unwrap();
        assert_eq!(ix.records.len(), 1);
        assert!(ix.by_okato.is_empty());
    }
}
