use std::path::PathBuf;

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::core::Year;
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::foundation::math::to_opaque_rgba8;
use crate::render::frame::FrameRGBA;

/// NeuQuant sampling factor; 1 is best quality, 30 fastest.
const QUANT_SPEED: i32 = 10;

/// Looping animated GIF written to `out_path` on `end`.
pub struct GifSink {
    out_path: PathBuf,
    bg_rgba: [u8; 4],
    cfg: Option<SinkConfig>,
    last_year: Option<Year>,
    frames: Vec<image::Frame>,
}

impl GifSink {
    pub fn new(out_path: impl Into<PathBuf>, bg_rgba: [u8; 4]) -> Self {
        Self {
            out_path: out_path.into(),
            bg_rgba,
            cfg: None,
            last_year: None,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> GeodashResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GeodashError::encode("gif sink width/height must be non-zero"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(GeodashError::encode("gif frames are limited to 65535x65535"));
        }
        self.cfg = Some(cfg);
        self.last_year = None;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, year: Year, frame: &FrameRGBA) -> GeodashResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| GeodashError::encode("gif sink not started"))?;
        check_frame(cfg, self.last_year, year, frame)?;
        self.last_year = Some(year);

        let data = if frame.premultiplied {
            to_opaque_rgba8(&frame.data, self.bg_rgba)?
        } else {
            frame.data.clone()
        };
        let buf = image::RgbaImage::from_raw(frame.width, frame.height, data)
            .ok_or_else(|| GeodashError::encode("gif frame buffer has the wrong length"))?;
        let delay = image::Delay::from_numer_denom_ms(1000, cfg.fps.get());
        self.frames.push(image::Frame::from_parts(buf, 0, 0, delay));
        Ok(())
    }

    fn end(&mut self) -> GeodashResult<()> {
        self.cfg
            .take()
            .ok_or_else(|| GeodashError::encode("gif sink not started"))?;
        if self.frames.is_empty() {
            return Err(GeodashError::encode("gif needs at least one frame"));
        }

        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, QUANT_SPEED);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| GeodashError::encode(format!("gif repeat: {e}")))?;
            encoder
                .encode_frames(self.frames.drain(..))
                .map_err(|e| GeodashError::encode(format!("gif encode: {e}")))?;
        }

        ensure_parent_dir(&self.out_path)?;
        std::fs::write(&self.out_path, &bytes)
            .with_context(|| format!("write gif '{}'", self.out_path.display()))?;
        Ok(())
    }
}
