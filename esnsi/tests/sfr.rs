use std::{fs::File, path::PathBuf};

use esnsi::{
    classifiers::{Sfr, SfrCo, SfrRecord},
    error::{Error, SchemaError, ValidationError},
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> File {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "data", name].iter().collect();
    File::open(&path).unwrap_or_else(|e| panic!("open {}: {e}", path.display()))
}

#[test]
fn offices_are_decoded() {
    let sfr = Sfr::from_reader(fixture("sfr-valid.xml")).unwrap();

    assert_eq!(sfr.name, "Клиентские службы СФР");
    assert_eq!(sfr.code, "SFR_CO");
    assert_eq!(sfr.version, 55);
    assert_eq!(sfr.len(), 2);

    assert_eq!(
        sfr.records[0],
        SfrRecord {
            coid: 1831,
            auto_key: "SFR_CO_1831_1".into(),
            to_sfr_code: "210".into(),
            region_code: "013".into(),
            region_name: "Республика Татарстан".into(),
            division_code: "401".into(),
            office_code: "401".into(),
            office_district_name: "г. Набережные Челны".into(),
            to_sfr_name: "Клиентская служба СФР в г. Набережные Челны (пр-кт Мира)".into(),
            office_type: 2,
            predecessor: 1,
            address: "423812, г. Набережные Челны, пр-кт Мира, д. 16".into(),
            okato: "92430000000".into(),
            okato_area: "92430".into(),
            oktmo: "92730000001".into(),
            oktmo_area: "92730".into(),
            email: String::new(),
            phone: "8 (800) 100-00-01".into(),
            latitude: "55.7310453".into(),
            longitude: "52.3967788".into(),
            working_time: "Пн-Пт: с 8:00 до 17:00, Сб: с 8:00 до 15:45, Вс - выходной".into(),
            utc: "UTC+03:00".into(),
            msk: 0,
            tofss: "1600".into(),
            okato_areas: vec!["92430".into()],
        }
    );

    let r1 = &sfr.records[1];
    assert_eq!(r1.coid, 1832);
    assert_eq!(r1.okato_area, "92432, 45277592");
    assert_eq!(r1.okato_areas, vec!["92432", "45277592"]);
    assert_eq!(r1.msk, 0);
    assert_eq!(r1.address, "");
}

#[test]
fn okato_indices() {
    let sfr = Sfr::from_reader(fixture("sfr-valid.xml")).unwrap();

    assert_eq!(sfr.okato_index().len(), 3);
    assert_eq!(sfr.by_okato("92430").map(|r| r.coid), Some(1831));
    assert_eq!(sfr.by_okato("92432").map(|r| r.coid), Some(1832));
    assert_eq!(sfr.by_okato("45277592").map(|r| r.coid), Some(1832));
    assert!(sfr.by_okato("92430000000").is_none());

    assert_eq!(sfr.okato11_index().len(), 3);
    for key in ["92430000000", "92432000000", "45277592000"] {
        assert_eq!(sfr.by_okato11(key).len(), 1, "{key}");
    }

    assert_eq!(sfr.okato8_index().len(), 3);
    assert_eq!(sfr.by_okato8("45277592").len(), 1);
    assert_eq!(sfr.okato5_index().len(), 3);
    assert_eq!(sfr.by_okato5("45277").len(), 1);

    assert_eq!(sfr.okato2_index().len(), 2);
    let coids: Vec<i64> = sfr.by_okato2("92").iter().map(|r| r.coid).collect();
    assert_eq!(coids, vec![1831, 1832]);
    assert_eq!(sfr.by_okato2("45").len(), 1);
}

#[test]
fn shared_area_keeps_last_exact_and_first_canonical() {
    let sfr = Sfr::from_reader(fixture("sfr-okato-area-shared.xml")).unwrap();

    assert_eq!(sfr.records[0].okato_areas, vec!["92430", "92432"]);
    assert_eq!(sfr.by_okato("92430").map(|r| r.coid), Some(2));
    assert_eq!(sfr.by_okato("92432").map(|r| r.coid), Some(1));

    let first: Vec<i64> = sfr.by_okato11("92430000000").iter().map(|r| r.coid).collect();
    assert_eq!(first, vec![1]);
    let all: Vec<i64> = sfr.by_okato5("92430").iter().map(|r| r.coid).collect();
    assert_eq!(all, vec![1, 2]);
}

#[test]
fn invalid_area_token() {
    let err = Sfr::from_reader(fixture("sfr-okato-area-invalid.xml")).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::InvalidCode {
            scheme: "OKATO",
            code: "92X30".into(),
        })
    );
    assert_eq!(err.to_string(), "handler error at record 0: invalid OKATO code '92X30'");
}

#[test]
fn empty_area_tokens_are_skipped() {
    let sfr = Sfr::from_reader(fixture("sfr-okato-area-empty.xml")).unwrap();

    assert_eq!(sfr.len(), 2);
    assert_eq!(sfr.records[0].okato_area, "123456,");
    assert_eq!(sfr.records[0].okato_areas, vec!["123456"]);
    assert_eq!(sfr.records[1].okato_area, " ");
    assert!(sfr.records[1].okato_areas.is_empty());
    assert_eq!(sfr.okato_index().keys().collect::<Vec<_>>(), vec!["123456"]);
    assert_eq!(sfr.by_okato11("12345600000").len(), 1);
}

#[test]
fn missing_integer_payload() {
    let err = Sfr::from_reader(fixture("sfr-coid-missing.xml")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "integer value for attribute coid is not set (record 0)"
    );
}

#[test]
fn schema_kind_mismatch() {
    let err = Sfr::from_reader(fixture("sfr-msk-as-string.xml")).unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::TypeMismatch { .. })), "{err:?}");
    assert_eq!(
        err.to_string(),
        "field msk has type int, expected string for attribute MSK with Ref msk"
    );
}

#[test]
fn one_office_per_area() {
    let co = SfrCo::from_reader(fixture("sfr-valid.xml")).unwrap();
    assert_eq!(co.len(), 2);
    assert_eq!(co.okato_index().len(), 3);
    assert_eq!(co.by_okato("45277592").map(|r| r.coid), Some(1832));

    let co = SfrCo::from_reader(fixture("sfr-okato-area-empty.xml")).unwrap();
    assert_eq!(co.okato_index().len(), 1);
}

#[test]
fn second_office_for_area_is_rejected() {
    let err = SfrCo::from_reader(fixture("sfr-okato-area-shared.xml")).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::DuplicateKey {
            scheme: "OKATO",
            key: "92430".into(),
        })
    );
    assert_eq!(err.to_string(), "handler error at record 1: duplicate OKATO code '92430'");
}
