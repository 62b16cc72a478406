use super::*;
use crate::catalog::indicators::Indicator;
use crate::data::table::ObservationRow;
use crate::foundation::core::Year;

#[test]
fn themes_select_distinct_fixed_scales() {
    assert_eq!(Theme::Dark.scale(), ColorScale::VIRIDIS);
    assert_eq!(Theme::Light.scale(), ColorScale::PLASMA);
    assert_ne!(Theme::Dark.scale(), Theme::Light.scale());
    assert_ne!(Theme::Dark.template(), Theme::Light.template());
}

#[test]
fn scale_endpoints_match_stops() {
    let s = ColorScale::VIRIDIS;
    assert_eq!(s.at(0.0).hex(), "#440154");
    assert_eq!(s.at(1.0).hex(), "#fde725");
    assert_eq!(s.at(-3.0), s.at(0.0));
    assert_eq!(s.at(7.0), s.at(1.0));
    assert_eq!(s.at(f64::NAN), s.at(0.0));
    assert_eq!(ColorScale::PLASMA.at(1.0).hex(), "#f0f921");
}

#[test]
fn color_for_degenerate_domain_is_mid_scale() {
    let s = ColorScale::PLASMA;
    assert_eq!(s.color_for(5.0, (5.0, 5.0)), s.at(0.5));
    assert_eq!(s.color_for(10.0, (0.0, 10.0)), s.at(1.0));
}

#[test]
fn theme_parses_case_insensitively() {
    assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
    assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
    assert!("sepia".parse::<Theme>().is_err());
}

#[test]
fn format_sci_matches_printf_style() {
    assert_eq!(format_sci(12345.0), "1.23e+04");
    assert_eq!(format_sci(0.00123), "1.23e-03");
    assert_eq!(format_sci(0.0), "0.00e+00");
    assert_eq!(format_sci(-2.5e120), "-2.50e+120");
}

#[test]
fn style_uses_full_table_domain_and_quantile_ticks() {
    let rows = (0..5)
        .map(|i| ObservationRow {
            country: format!("C{i}"),
            country_id: format!("C{i}"),
            year: Year(2000 + i),
            value: f64::from(i) * 10.0,
        })
        .collect();
    let table = MetricTable::new(Indicator::new("Population", "SP.POP.TOTL"), rows).unwrap();
    let style = MapStyle::for_table(&table, Theme::Dark).unwrap();
    assert_eq!(style.domain, (0.0, 40.0));
    assert_eq!(style.scale, ColorScale::VIRIDIS);
    let labels: Vec<&str> = style.ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["4.00e+00", "2.00e+01", "3.60e+01"]);
    assert_eq!(style.color_for(40.0).hex(), "#fde725");
}
