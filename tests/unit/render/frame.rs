use super::*;
use crate::data::table::MetricTable;
use crate::render::style::Theme;

const FIXTURE: &str = include_str!("../../data/world_min.geojson");

fn boundaries() -> BoundarySet {
    BoundarySet::from_geojson_str(FIXTURE, "ADM0_A3", "NAME").unwrap()
}

fn table() -> MetricTable {
    let row = |country: &str, id: &str, year: i32, value: f64| ObservationRow {
        country: country.to_string(),
        country_id: id.to_string(),
        year: Year(year),
        value,
    };
    MetricTable::new(
        Indicator::new("Population", "SP.POP.TOTL"),
        vec![
            row("Pakistan", "PAK", 2000, 100.0),
            row("India", "IND", 2000, 1000.0),
            row("Pakistan", "PAK", 2001, 200.0),
        ],
    )
    .unwrap()
}

fn renderer() -> FrameRenderer {
    FrameRenderer::new(Canvas {
        width: 320,
        height: 180,
    })
    .unwrap()
}

fn pixel_at(frame: &FrameRGBA, r: &FrameRenderer, lon: f64, lat: f64) -> [u8; 4] {
    let p = r.projection().project(lon, lat);
    frame.pixel(p.x as u32, p.y as u32).unwrap()
}

#[test]
fn frame_has_canvas_size() {
    let r = renderer();
    let t = table();
    let style = MapStyle::for_table(&t, Theme::Light).unwrap();
    let frame = r
        .render_year_frame(
            &t.slice_for_year(Year(2000)),
            t.indicator(),
            Year(2000),
            &style,
            &boundaries(),
        )
        .unwrap();
    assert_eq!((frame.width, frame.height), (320, 180));
    assert_eq!(frame.data.len(), 320 * 180 * 4);
    assert!(frame.premultiplied);
}

#[test]
fn countries_are_filled_from_the_scale_and_gaps_use_land() {
    let r = renderer();
    let t = table();
    let b = boundaries();
    let style = MapStyle::for_table(&t, Theme::Dark).unwrap();
    let frame = r
        .render_year_frame(&t.slice_for_year(Year(2000)), t.indicator(), Year(2000), &style, &b)
        .unwrap();

    let tpl = Theme::Dark.template();
    assert_eq!(pixel_at(&frame, &r, 80.0, 15.0), style.color_for(1000.0).rgba());
    assert_eq!(pixel_at(&frame, &r, 69.0, 30.5), style.color_for(100.0).rgba());
    // Brazil has no observation
    assert_eq!(pixel_at(&frame, &r, -55.0, -15.0), tpl.land.rgba());
    assert_eq!(frame.pixel(319, 179).unwrap(), tpl.background.rgba());
}

#[test]
fn later_year_without_a_country_leaves_it_unfilled() {
    let r = renderer();
    let t = table();
    let style = MapStyle::for_table(&t, Theme::Light).unwrap();
    let frame = r
        .render_year_frame(
            &t.slice_for_year(Year(2001)),
            t.indicator(),
            Year(2001),
            &style,
            &boundaries(),
        )
        .unwrap();
    assert_eq!(
        pixel_at(&frame, &r, 80.0, 15.0),
        Theme::Light.template().land.rgba()
    );
    assert_eq!(pixel_at(&frame, &r, 69.0, 30.5), style.color_for(200.0).rgba());
}

#[test]
fn theme_changes_the_fill() {
    let r = renderer();
    let t = table();
    let b = boundaries();
    let slice = t.slice_for_year(Year(2000));
    let dark = MapStyle::for_table(&t, Theme::Dark).unwrap();
    let light = MapStyle::for_table(&t, Theme::Light).unwrap();
    let fd = r.render_year_frame(&slice, t.indicator(), Year(2000), &dark, &b).unwrap();
    let fl = r.render_year_frame(&slice, t.indicator(), Year(2000), &light, &b).unwrap();
    assert_ne!(pixel_at(&fd, &r, 80.0, 15.0), pixel_at(&fl, &r, 80.0, 15.0));
}

#[test]
fn scene_svg_escapes_title_and_lists_ticks() {
    let r = renderer();
    let t = table();
    let style = MapStyle::for_table(&t, Theme::Light).unwrap();
    let svg = r.scene_svg(&t.slice_for_year(Year(2000)), "A & B", &style, &boundaries());
    assert!(svg.contains("A &amp; B"));
    for tick in &style.ticks {
        assert!(svg.contains(&tick.label));
    }
    assert_eq!(svg.matches("<path ").count(), 3);
}

#[test]
fn png_round_trips_dimensions() {
    let r = renderer();
    let t = table();
    let style = MapStyle::for_table(&t, Theme::Light).unwrap();
    let frame = r
        .render_year_frame(
            &t.slice_for_year(Year(2000)),
            t.indicator(),
            Year(2000),
            &style,
            &boundaries(),
        )
        .unwrap();
    let png = encode_png(&frame, Theme::Light.template().background).unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (320, 180));
}

#[test]
fn odd_canvas_is_rejected() {
    assert!(
        FrameRenderer::new(Canvas {
            width: 321,
            height: 180
        })
        .is_err()
    );
}
