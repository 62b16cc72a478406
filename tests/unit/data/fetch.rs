use super::*;

fn obs(country: &str, date: &str, value: Option<f64>) -> RawObservation {
    RawObservation {
        country: country.to_string(),
        country_id: country[..3].to_uppercase(),
        date: date.to_string(),
        value,
    }
}

fn range() -> YearRange {
    YearRange::new(Year(2000), Year(2002)).unwrap()
}

#[test]
fn parse_year_accepts_provider_formats() {
    assert_eq!(parse_year("2001"), Some(Year(2001)));
    assert_eq!(parse_year("2001-07-01"), Some(Year(2001)));
    assert_eq!(parse_year("2001M07"), Some(Year(2001)));
    assert_eq!(parse_year("2001Q3"), Some(Year(2001)));
    assert_eq!(parse_year("01"), None);
    assert_eq!(parse_year("2001-13-45"), None);
    assert_eq!(parse_year("2001X"), None);
}

#[test]
fn normalize_drops_nulls_and_out_of_range_years() {
    let rows = normalize_rows(
        vec![
            obs("Pakistan", "2003", Some(1.0)),
            obs("Pakistan", "2002", Some(2.0)),
            obs("Pakistan", "2001", None),
            obs("Pakistan", "2000", Some(f64::NAN)),
            obs("India", "1999", Some(3.0)),
            obs("India", "2000", Some(4.0)),
        ],
        range(),
    )
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| range().contains(r.year) && r.value.is_finite()));
    // provider order is kept
    assert_eq!(rows[0].country, "Pakistan");
    assert_eq!(rows[1].country, "India");
}

#[test]
fn normalize_keeps_first_duplicate() {
    let rows = normalize_rows(
        vec![obs("India", "2001", Some(1.0)), obs("India", "2001-06-01", Some(9.0))],
        range(),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, 1.0);
}

#[test]
fn bad_dates_are_provider_errors() {
    let err = normalize_rows(vec![obs("India", "sometime", Some(1.0))], range()).unwrap_err();
    assert!(matches!(err, GeodashError::Provider(_)));
}
