use std::io::Cursor;

use image::AnimationDecoder as _;

use super::*;
use crate::encode::sink::InMemorySink;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: rgba.repeat((width * height) as usize),
        premultiplied: true,
    }
}

fn three_frames() -> Vec<(Year, FrameRGBA)> {
    vec![
        (Year(2000), solid(8, 6, [255, 0, 0, 255])),
        (Year(2001), solid(8, 6, [0, 255, 0, 255])),
        (Year(2002), solid(8, 6, [0, 0, 255, 255])),
    ]
}

#[test]
fn validate_rejects_empty_input() {
    let err = validate_frames(&[]).unwrap_err();
    assert!(matches!(err, GeodashError::Encode(_)));
}

#[test]
fn validate_rejects_mismatched_dimensions() {
    let mut frames = three_frames();
    frames[2].1 = solid(10, 6, [0, 0, 0, 255]);
    let err = validate_frames(&frames).unwrap_err();
    assert!(matches!(err, GeodashError::Encode(_)));
    assert!(err.to_string().contains("10x6"));
}

#[test]
fn validate_rejects_unordered_years() {
    let mut frames = three_frames();
    frames.swap(0, 1);
    assert!(validate_frames(&frames).is_err());

    let mut frames = three_frames();
    frames[1].0 = Year(2000);
    assert!(validate_frames(&frames).is_err());
}

#[test]
fn mismatch_never_starts_a_sink() {
    let mut frames = three_frames();
    frames[1].1 = solid(8, 8, [0, 0, 0, 255]);
    let mut sink = InMemorySink::new();
    let fps = Fps::new(2).unwrap();
    assert!(stream_frames(&frames, fps, &mut [&mut sink]).is_err());
    assert!(sink.config().is_none());
    assert!(sink.frames().is_empty());
}

#[test]
fn stream_preserves_year_order() {
    let frames = three_frames();
    let mut sink = InMemorySink::new();
    stream_frames(&frames, Fps::new(3).unwrap(), &mut [&mut sink]).unwrap();
    let years: Vec<Year> = sink.frames().iter().map(|(y, _)| *y).collect();
    assert_eq!(years, vec![Year(2000), Year(2001), Year(2002)]);
    assert_eq!(sink.config().unwrap().fps.get(), 3);
    assert!(sink.is_finished());
}

#[test]
fn sink_rejects_out_of_order_push() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 8,
        height: 6,
        fps: Fps::default(),
    })
    .unwrap();
    let f = solid(8, 6, [0, 0, 0, 255]);
    sink.push_frame(Year(2001), &f).unwrap();
    assert!(sink.push_frame(Year(2000), &f).is_err());
    assert!(sink.push_frame(Year(2002), &solid(4, 6, [0, 0, 0, 255])).is_err());
}

#[test]
fn gif_sink_encodes_every_frame_in_order_at_fps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SP.POP.TOTL.gif");
    let mut gif = GifSink::new(&path, [255, 255, 255, 255]);
    stream_frames(&three_frames(), Fps::new(2).unwrap(), &mut [&mut gif]).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);

    let (numer, denom) = frames[0].delay().numer_denom_ms();
    assert_eq!(f64::from(numer) / f64::from(denom), 500.0);

    let first = frames[0].buffer().get_pixel(0, 0).0;
    let last = frames[2].buffer().get_pixel(0, 0).0;
    assert!(first[0] > 200 && first[2] < 50, "first frame should be red: {first:?}");
    assert!(last[2] > 200 && last[0] < 50, "last frame should be blue: {last:?}");
}

#[test]
fn gif_frame_delay_follows_fps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fast.gif");
    let mut gif = GifSink::new(&path, [0, 0, 0, 255]);
    stream_frames(&three_frames(), Fps::new(4).unwrap(), &mut [&mut gif]).unwrap();

    let decoder =
        image::codecs::gif::GifDecoder::new(Cursor::new(std::fs::read(&path).unwrap())).unwrap();
    for frame in decoder.into_frames().collect_frames().unwrap() {
        let (numer, denom) = frame.delay().numer_denom_ms();
        assert_eq!(f64::from(numer) / f64::from(denom), 250.0);
    }
}

#[test]
fn assemble_fails_fast_on_mismatch_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let gif = dir.path().join("x.gif");
    let mp4 = dir.path().join("x.mp4");
    let mut frames = three_frames();
    frames[0].1 = solid(6, 6, [0, 0, 0, 255]);
    let err = assemble(&frames, Fps::new(1).unwrap(), &gif, &mp4, [0, 0, 0, 255]).unwrap_err();
    assert!(matches!(err, GeodashError::Encode(_)));
    assert!(!gif.exists());
    assert!(!mp4.exists());
}
