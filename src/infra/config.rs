use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::infra::error::AppError;

/// Optional override file, looked up in the working directory.
pub const CONFIG_FILE: &str = "foto-filtro.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas_size: f32,
    pub window_width: f32,
    pub window_height: f32,
    pub picker_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas_size: 300.0,
            window_width: 420.0,
            window_height: 640.0,
            picker_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "bmp".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Reads the override file if present; a missing file yields defaults,
    /// a malformed one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, AppError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|error| AppError::Config(format!("{}: {error}", path.display()))),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(AppError::Io(format!("{}: {error}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_uses_fixed_canvas_and_window() {
        let config = AppConfig::default();
        assert_eq!(config.canvas_size, 300.0);
        assert_eq!(config.window_width, 420.0);
        assert_eq!(config.window_height, 640.0);
        assert!(config.picker_extensions.contains(&"jpg".to_string()));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().expect("tempdir should be created");
        let config = AppConfig::load_or_default(&dir.path().join("absent.json"))
            .expect("missing file should not be an error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn override_file_replaces_listed_fields_only() {
        let dir = TempDir::new().expect("tempdir should be created");
        let path = dir.path().join("foto-filtro.json");
        std::fs::write(&path, r#"{ "canvas_size": 256.0 }"#).expect("config should be written");

        let config = AppConfig::load_or_default(&path).expect("override should parse");
        assert_eq!(config.canvas_size, 256.0);
        assert_eq!(config.window_width, AppConfig::default().window_width);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = TempDir::new().expect("tempdir should be created");
        let path = dir.path().join("foto-filtro.json");
        std::fs::write(&path, "{ canvas_size:").expect("config should be written");

        assert!(matches!(
            AppConfig::load_or_default(&path),
            Err(AppError::Config(_))
        ));
    }
}
