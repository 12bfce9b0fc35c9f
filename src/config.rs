use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Dimensions;

/// Caps applied when fitting media onto the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Widest a portrait media may be drawn
    pub portrait_max_width: f32,
    /// Tallest a landscape or square media may be drawn
    pub landscape_max_height: f32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            portrait_max_width: 500.0,
            landscape_max_height: 600.0,
        }
    }
}

/// Initial state of a range setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub min: f32,
    pub max: f32,
    pub value: f32,
    /// Whether the companion "default" checkbox starts checked
    pub use_default: bool,
}

/// Look of the selection rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionStyle {
    pub stroke_width: f32,
    pub stroke_gray: u8,
    pub fill_alpha: u8,
}

impl Default for SelectionStyle {
    fn default() -> Self {
        // 1px black outline over a 5% black fill
        Self {
            stroke_width: 1.0,
            stroke_gray: 0,
            fill_alpha: 13,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to defaults
pub struct ViewerConfig {
    /// Canvas size while no media is loaded
    pub default_canvas: Dimensions,
    pub fit: FitConfig,
    /// Recursion depth used when the setting is absent or not positive
    pub default_recursion: usize,
    pub canvas_width: RangeConfig,
    pub nb_recursion: RangeConfig,
    pub accepted_mime_prefixes: Vec<String>,
    pub selection: SelectionStyle,
    pub texture_cache_size: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_canvas: Dimensions::new(100.0, 100.0),
            fit: FitConfig::default(),
            default_recursion: 5,
            canvas_width: RangeConfig {
                min: 100.0,
                max: 2000.0,
                value: 800.0,
                use_default: true,
            },
            nb_recursion: RangeConfig {
                min: 1.0,
                max: 20.0,
                value: 5.0,
                use_default: false,
            },
            accepted_mime_prefixes: vec!["image/".to_owned(), "video/".to_owned()],
            selection: SelectionStyle::default(),
            texture_cache_size: 8,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects range settings whose bounds are not finite or are inverted
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, range) in [
            ("canvas_width", &self.canvas_width),
            ("nb_recursion", &self.nb_recursion),
        ] {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    /// Reads a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Config named by `DROSTE_VIEW_CONFIG`, or the defaults.
    ///
    /// A broken file is reported and ignored rather than aborting startup.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        match std::env::var_os("DROSTE_VIEW_CONFIG") {
            Some(path) => match Self::load(std::path::Path::new(&path)) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.to_string_lossy());
                    config
                }
                Err(err) => {
                    log::warn!("Ignoring config: {}", err);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
