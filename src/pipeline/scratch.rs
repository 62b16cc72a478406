use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Year;
use crate::foundation::error::GeodashResult;

/// Per-run temporary directory for frames and encoded media.
///
/// Each acquisition is a fresh, empty directory; it is removed with its contents on drop.
#[derive(Debug)]
pub struct ScratchDir {
    dir: tempfile::TempDir,
}

impl ScratchDir {
    /// Create a new directory under `root`, or under the system temp dir when `None`.
    pub fn acquire(root: Option<&Path>) -> GeodashResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("geodash-");
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)
                    .with_context(|| format!("create scratch root '{}'", root.display()))?;
                builder
                    .tempdir_in(root)
                    .with_context(|| format!("create scratch dir in '{}'", root.display()))?
            }
            None => builder.tempdir().context("create scratch dir")?,
        };
        tracing::debug!(path = %dir.path().display(), "acquired scratch dir");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn frame_path(&self, code: &str, year: Year) -> PathBuf {
        self.path().join(frame_file_name(code, year))
    }

    pub fn gif_path(&self, code: &str) -> PathBuf {
        self.path().join(gif_file_name(code))
    }

    pub fn mp4_path(&self, code: &str) -> PathBuf {
        self.path().join(mp4_file_name(code))
    }
}

pub fn frame_file_name(code: &str, year: Year) -> String {
    format!("{code}_{year}.png")
}

pub fn gif_file_name(code: &str) -> String {
    format!("{code}.gif")
}

pub fn mp4_file_name(code: &str) -> String {
    format!("{code}.mp4")
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/scratch.rs"]
mod tests;
