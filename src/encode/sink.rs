use crate::foundation::core::{Fps, Year};
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing years.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> GeodashResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, year: Year, frame: &FrameRGBA) -> GeodashResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> GeodashResult<()>;
}

/// Shared ordering and size checks for sink implementations.
pub(crate) fn check_frame(
    cfg: &SinkConfig,
    last: Option<Year>,
    year: Year,
    frame: &FrameRGBA,
) -> GeodashResult<()> {
    if let Some(last) = last
        && year <= last
    {
        return Err(GeodashError::encode(format!(
            "out-of-order frame: {year} after {last}"
        )));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(GeodashError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != (cfg.width * cfg.height * 4) as usize {
        return Err(GeodashError::encode(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(Year, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(Year, FrameRGBA)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GeodashResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, year: Year, frame: &FrameRGBA) -> GeodashResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| GeodashError::encode("in-memory sink not started"))?;
        check_frame(cfg, self.frames.last().map(|(y, _)| *y), year, frame)?;
        self.frames.push((year, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> GeodashResult<()> {
        self.finished = true;
        Ok(())
    }
}
