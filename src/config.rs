use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LensError, LensResult};
use crate::overlay::types::Viewport;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub presets: PresetsConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Marker appearance and touch tolerance, both in screen pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f32,
    #[serde(default = "default_shadow_radius")]
    pub shadow_radius: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            marker_radius: default_marker_radius(),
            shadow_radius: default_shadow_radius(),
        }
    }
}

fn default_marker_radius() -> f32 {
    40.0
}

fn default_shadow_radius() -> f32 {
    10.0
}

/// Size of the on-screen area the preview is rendered into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: u32,
    #[serde(default = "default_viewport_height")]
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

fn default_viewport_width() -> u32 {
    1080
}

fn default_viewport_height() -> u32 {
    1440
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Only detections carrying this label are kept. Empty disables the filter.
    #[serde(default = "default_required_label")]
    pub required_label: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            required_label: default_required_label(),
        }
    }
}

impl DetectorConfig {
    pub fn label_filter(&self) -> Option<&str> {
        let label = self.required_label.trim();
        (!label.is_empty()).then_some(label)
    }
}

fn default_required_label() -> String {
    "Fashion good".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetsConfig {
    #[serde(default = "default_presets_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_preset_images")]
    pub images: Vec<String>,
    /// Preset shown when the screen first opens.
    #[serde(default = "default_preset_index")]
    pub default_index: usize,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            dir: default_presets_dir(),
            images: default_preset_images(),
            default_index: default_preset_index(),
        }
    }
}

impl PresetsConfig {
    pub fn default_image(&self) -> Option<&str> {
        self.images.get(self.default_index).map(String::as_str)
    }
}

fn default_presets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_preset_images() -> Vec<String> {
    vec!["Preset1.jpg", "Preset2.jpg", "Preset3.jpg"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_preset_index() -> usize {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Where camera output files are created. Falls back to the OS pictures dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            dir: None,
        }
    }
}

fn default_file_prefix() -> String {
    "MLKitDemo_".to_string()
}

fn resolve_config_path() -> LensResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(LensError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> LensResult<AppConfig> {
    let path = resolve_config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> LensResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    if config.overlay.marker_radius <= 0.0 {
        return Err(LensError::Config(format!(
            "overlay.marker_radius must be positive, got {}",
            config.overlay.marker_radius
        )));
    }
    tracing::info!(
        path = %path.display(),
        marker_radius = config.overlay.marker_radius,
        "config loaded"
    );
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> LensResult<()> {
    let path = resolve_config_path()?;
    save_config_to(config, &path)
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> LensResult<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("objectlens-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.overlay.marker_radius, 40.0);
        assert_eq!(config.overlay.shadow_radius, 10.0);
        assert_eq!(config.detector.label_filter(), Some("Fashion good"));
        assert_eq!(config.presets.default_image(), Some("Preset2.jpg"));
        assert_eq!(config.capture.file_prefix, "MLKitDemo_");
    }

    #[test]
    fn blank_label_disables_filter() {
        let config: AppConfig = toml::from_str("[detector]\nrequired_label = \"  \"\n").unwrap();
        assert_eq!(config.detector.label_filter(), None);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = temp_path("config.toml");
        let mut config = AppConfig::default();
        config.viewport.width = 500;
        config.viewport.height = 700;
        config.overlay.marker_radius = 24.0;

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.viewport.viewport(), Viewport::new(500, 700));
        assert_eq!(loaded.overlay.marker_radius, 24.0);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let path = temp_path("bad.toml");
        std::fs::write(&path, "[overlay]\nmarker_radius = 0.0\n").unwrap();
        let result = load_config_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LensError::Config(_))));
    }
}
