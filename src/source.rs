/// Where displayed images come from: bundled presets, picked files and camera output.
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use uuid::Uuid;

use crate::errors::LensResult;

/// Decode an image picked from disk or written by the camera.
///
/// The raster is normalised to RGBA8 so crops and previews share one layout.
pub fn load_image(path: &Path) -> LensResult<DynamicImage> {
    let img = image::open(path)?;
    tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), "image loaded");
    Ok(DynamicImage::ImageRgba8(img.to_rgba8()))
}

/// Load a bundled preset. Missing or undecodable presets yield `None`.
pub fn load_preset(dir: &Path, name: &str) -> Option<DynamicImage> {
    let path = dir.join(name);
    match load_image(&path) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "preset unavailable");
            None
        }
    }
}

/// Create an empty, uniquely named `.jpg` file for the camera to write into.
///
/// Uses `dir` when given, else the user's pictures directory, else the temp dir.
pub fn create_capture_file(dir: Option<&Path>, prefix: &str) -> LensResult<PathBuf> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => dirs::picture_dir().unwrap_or_else(std::env::temp_dir),
    };
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{prefix}{}.jpg", Uuid::new_v4().simple()));
    OpenOptions::new().write(true).create_new(true).open(&path)?;
    tracing::debug!(path = %path.display(), "capture file created");
    Ok(path)
}
