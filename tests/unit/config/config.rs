use super::*;
use crate::foundation::core::Year;

#[test]
fn empty_object_yields_defaults() {
    let cfg: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, Config::default());
    assert!(cfg.validate().is_ok());
    let years = cfg.years().unwrap();
    assert_eq!((years.start, years.end), (Year(2000), Year(2022)));
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<Config>(r#"{"nope": 1}"#).is_err());
}

#[test]
fn policy_and_dates_parse() {
    let cfg: Config = serde_json::from_str(
        r#"{"unresolved_countries": "reject", "start_date": "2005-01-01", "end_date": "2006-12-31"}"#,
    )
    .unwrap();
    assert_eq!(cfg.unresolved_countries, UnresolvedPolicy::Reject);
    assert_eq!(cfg.years().unwrap().len_years(), 2);
}

#[test]
fn validate_catches_bad_values() {
    let mut cfg = Config::default();
    cfg.start_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.canvas = Canvas { width: 101, height: 100 };
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.api_base_url = "  ".to_string();
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reads_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geodash.json");
    std::fs::write(&path, r#"{"request_timeout_secs": 5}"#).unwrap();
    let cfg = Config::from_path(&path).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
    assert!(Config::from_path(dir.path().join("missing.json")).is_err());
}
