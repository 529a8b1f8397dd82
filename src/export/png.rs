use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDateTime;

use crate::{foundation::core::Bitmap, foundation::error::PosterResult};

/// `output-YYYYMMDD-HHMMSS.png` for the given local time.
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("output-{}.png", at.format("%Y%m%d-%H%M%S"))
}

/// Current local time, the clock used for export file names.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn ensure_parent_dir(path: &Path) -> PosterResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encode `bitmap` as an RGBA8 PNG at `path`.
pub fn write_png(path: &Path, bitmap: &Bitmap) -> PosterResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &bitmap.data,
        bitmap.width,
        bitmap.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Write `bitmap` into `dir` under a timestamped name and return the full path.
pub fn export_png(dir: &Path, bitmap: &Bitmap, at: NaiveDateTime) -> PosterResult<PathBuf> {
    let path = dir.join(export_file_name(at));
    write_png(&path, bitmap)?;
    tracing::info!(path = %path.display(), "exported poster");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
