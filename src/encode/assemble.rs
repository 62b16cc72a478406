use std::path::Path;

use anyhow::Context as _;

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::gif::GifSink;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, Year};
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::render::frame::FrameRGBA;

/// Encoded animation and video of one indicator.
#[derive(Clone, Debug)]
pub struct EncodedMedia {
    pub gif: Vec<u8>,
    pub mp4: Vec<u8>,
    pub frame_count: usize,
}

/// Check the assembler preconditions and return the shared frame size.
///
/// Requires at least one frame, identical dimensions and strictly ascending years.
pub fn validate_frames(frames: &[(Year, FrameRGBA)]) -> GeodashResult<(u32, u32)> {
    let Some((_, first)) = frames.first() else {
        return Err(GeodashError::encode("cannot assemble zero frames"));
    };
    let size = (first.width, first.height);

    for pair in frames.windows(2) {
        let ((prev, _), (year, frame)) = (&pair[0], &pair[1]);
        if year <= prev {
            return Err(GeodashError::encode(format!(
                "frames must be in ascending year order: {year} follows {prev}"
            )));
        }
        if (frame.width, frame.height) != size {
            return Err(GeodashError::encode(format!(
                "frame {year} is {}x{}, expected {}x{}",
                frame.width, frame.height, size.0, size.1
            )));
        }
    }
    Ok(size)
}

/// Validate, then feed every frame to every sink at `fps`.
///
/// No sink is started when validation fails.
pub fn stream_frames(
    frames: &[(Year, FrameRGBA)],
    fps: Fps,
    sinks: &mut [&mut dyn FrameSink],
) -> GeodashResult<()> {
    let (width, height) = validate_frames(frames)?;
    let cfg = SinkConfig { width, height, fps };

    for sink in sinks.iter_mut() {
        sink.begin(cfg)?;
    }
    for (year, frame) in frames {
        for sink in sinks.iter_mut() {
            sink.push_frame(*year, frame)?;
        }
    }
    for sink in sinks.iter_mut() {
        sink.end()?;
    }
    Ok(())
}

/// Encode `frames` into a GIF at `gif_path` and an MP4 at `mp4_path` and return both.
///
/// Both artifacts use the same frame rate.
#[tracing::instrument(skip(frames, bg_rgba), fields(frames = frames.len(), fps = fps.get()))]
pub fn assemble(
    frames: &[(Year, FrameRGBA)],
    fps: Fps,
    gif_path: &Path,
    mp4_path: &Path,
    bg_rgba: [u8; 4],
) -> GeodashResult<EncodedMedia> {
    let mut gif = GifSink::new(gif_path, bg_rgba);
    let mut mp4 = FfmpegSink::new(FfmpegSinkOpts::new(mp4_path).with_bg(bg_rgba));
    stream_frames(frames, fps, &mut [&mut gif, &mut mp4])?;

    let gif = std::fs::read(gif_path)
        .with_context(|| format!("read gif '{}'", gif_path.display()))?;
    let mp4 = std::fs::read(mp4_path)
        .with_context(|| format!("read mp4 '{}'", mp4_path.display()))?;
    tracing::debug!(gif_bytes = gif.len(), mp4_bytes = mp4.len(), "assembled media");

    Ok(EncodedMedia {
        gif,
        mp4,
        frame_count: frames.len(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/assemble.rs"]
mod tests;
