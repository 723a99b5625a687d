use thiserror::Error;

use crate::overlay::types::PixelRect;

#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No source image is displayed")]
    NoImage,

    #[error("Crop box {rect} lies outside the {width}x{height} source image")]
    CropOutOfBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Detection cancelled")]
    Cancelled,
}

impl serde::Serialize for LensError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type LensResult<T> = Result<T, LensError>;
