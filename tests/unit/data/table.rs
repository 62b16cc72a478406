use super::*;
use crate::data::trend::TrendView;

fn row(country: &str, id: &str, year: i32, value: f64) -> ObservationRow {
    ObservationRow {
        country: country.to_string(),
        country_id: id.to_string(),
        year: Year(year),
        value,
    }
}

fn table() -> MetricTable {
    MetricTable::new(
        Indicator::new("Population", "SP.POP.TOTL"),
        vec![
            row("Pakistan", "PAK", 2002, 4.0),
            row("India", "IND", 2002, 40.0),
            row("Pakistan", "PAK", 2000, 1.0),
            row("India", "IND", 2001, 20.0),
            row("Pakistan", "PAK", 2001, 2.0),
        ],
    )
    .unwrap()
}

#[test]
fn years_are_sorted_and_unique() {
    assert_eq!(table().years(), vec![Year(2000), Year(2001), Year(2002)]);
}

#[test]
fn slice_and_domain() {
    let t = table();
    assert_eq!(t.slice_for_year(Year(2001)).len(), 2);
    assert_eq!(t.value_domain(), Some((1.0, 40.0)));
    assert_eq!(t.countries(), vec!["India".to_string(), "Pakistan".to_string()]);
}

#[test]
fn quantile_interpolates_linearly() {
    let t = table();
    // sorted: 1, 2, 4, 20, 40
    assert_eq!(t.quantile(0.0), Some(1.0));
    assert_eq!(t.quantile(0.5), Some(4.0));
    assert_eq!(t.quantile(1.0), Some(40.0));
    assert!((t.quantile(0.1).unwrap() - 1.4).abs() < 1e-9);
    assert_eq!(t.quantile(1.5), None);
}

#[test]
fn duplicate_pairs_are_rejected() {
    let err = MetricTable::new(
        Indicator::new("Population", "SP.POP.TOTL"),
        vec![row("India", "IND", 2001, 1.0), row("India", "IND", 2001, 2.0)],
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn empty_table_has_no_domain() {
    let t = MetricTable::new(Indicator::new("Population", "SP.POP.TOTL"), vec![]).unwrap();
    assert!(t.is_empty());
    assert_eq!(t.value_domain(), None);
    assert_eq!(t.quantile(0.5), None);
}

#[test]
fn trend_pivot_fills_gaps_with_none() {
    let view = TrendView::pivot(&table());
    assert_eq!(view.years.len(), 3);
    assert_eq!(view.series.len(), 2);
    assert_eq!(view.value("India", Year(2000)), None);
    assert_eq!(view.value("India", Year(2002)), Some(40.0));
    assert_eq!(view.series["Pakistan"], vec![Some(1.0), Some(2.0), Some(4.0)]);
}
