use super::*;

const FIXTURE: &str = include_str!("../../data/world_min.geojson");

fn matching<'a>(set: &'a BoundarySet, id: &str, name: &str) -> Vec<&'a CountryShape> {
    let by_id = HashMap::from([(id, ())]);
    let by_name = HashMap::from([(name, ())]);
    set.shapes()
        .iter()
        .filter(|s| s.lookup(&by_id, &by_name).is_some())
        .collect()
}

#[test]
fn loads_polygons_and_multipolygons() {
    let set = BoundarySet::from_geojson_str(FIXTURE, "ADM0_A3", "NAME").unwrap();
    assert_eq!(set.len(), 3, "point features are skipped");
    let india = matching(&set, "IND", "India")[0];
    assert_eq!(india.polygons.len(), 2);
    assert_eq!(india.polygons[0][0].len(), 5);
}

#[test]
fn falls_back_to_feature_id_and_name() {
    let set = BoundarySet::from_geojson_str(FIXTURE, "ADM0_A3", "NAME").unwrap();
    assert_eq!(matching(&set, "BRA", "nope").len(), 1);
    let by_name = matching(&set, "???", "Pakistan");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id.as_deref(), Some("PAK"));
    assert!(matching(&set, "???", "Atlantis").is_empty());
}

#[test]
fn rejects_bare_geometry_and_empty_layers() {
    let bare = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
    assert!(BoundarySet::from_geojson_str(bare, "ADM0_A3", "NAME").is_err());
    let empty = r#"{"type": "FeatureCollection", "features": []}"#;
    assert!(BoundarySet::from_geojson_str(empty, "ADM0_A3", "NAME").is_err());
    assert!(BoundarySet::from_geojson_str("not json", "ADM0_A3", "NAME").is_err());
}

#[test]
fn load_reads_files() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/world_min.geojson");
    let http = reqwest::blocking::Client::new();
    let set = BoundarySet::load(path, "ADM0_A3", "NAME", &http).unwrap();
    assert_eq!(set.len(), 3);
    assert!(BoundarySet::load("/definitely/missing.geojson", "ADM0_A3", "NAME", &http).is_err());
}

#[test]
fn lookup_prefers_id_over_name() {
    let set = BoundarySet::from_geojson_str(FIXTURE, "ADM0_A3", "NAME").unwrap();
    let india = matching(&set, "IND", "India")[0];
    let by_id = HashMap::from([("IND", 1.0)]);
    let by_name = HashMap::from([("India", 2.0)]);
    assert_eq!(india.lookup(&by_id, &by_name), Some(&1.0));
    assert_eq!(india.lookup(&HashMap::new(), &by_name), Some(&2.0));
    assert_eq!(india.lookup::<f64>(&HashMap::new(), &HashMap::new()), None);
}
