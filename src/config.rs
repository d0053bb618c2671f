use crate::color::parse_color;
use crate::{RenderConfig, Rgba, ScaleMode};

/// Default per-frame duration in milliseconds.
pub const DEFAULT_DURATION_MS: u64 = 100;

/// Player settings, usually supplied as view attributes or a config file.
///
/// All fields have defaults so partial files deserialize.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    /// Time each frame stays on screen, in milliseconds (at least 1)
    pub duration_ms: u64,
    /// Wrap back to the first frame after the last one
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    pub looping: bool,
    /// Start playing the first time the surface becomes ready
    pub auto_start: bool,
    /// Surface clear color; transparent when unset or invalid
    pub background: Option<String>,
    pub scale: ScaleMode,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            looping: false,
            auto_start: false,
            background: None,
            scale: ScaleMode::Stretch,
        }
    }
}

impl PlayerConfig {
    /// Parse a TOML string into a `PlayerConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Build the render settings for a [`SurfaceRenderer`](crate::SurfaceRenderer).
    pub fn render_config(&self) -> RenderConfig {
        let background = self
            .background
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Rgba::TRANSPARENT);
        RenderConfig::new(background, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.duration_ms, 100);
        assert!(!config.looping);
        assert!(!config.auto_start);
        assert_eq!(config.render_config(), RenderConfig::default());
    }

    #[test]
    fn background_color() {
        let config = PlayerConfig {
            background: Some("#1a1a2e".into()),
            scale: ScaleMode::Fit,
            ..Default::default()
        };
        let render = config.render_config();
        assert_eq!(render.background, Rgba::opaque(26, 26, 46));
        assert_eq!(render.scale, ScaleMode::Fit);
    }

    #[test]
    fn invalid_background_fallback() {
        let config = PlayerConfig {
            background: Some("notacolor".into()),
            ..Default::default()
        };
        assert_eq!(config.render_config().background, Rgba::TRANSPARENT);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml() {
        let config = PlayerConfig::from_toml_str(
            r##"
            duration_ms = 40
            loop = true
            background = "#000"
            scale = "fit"
            "##,
        )
        .unwrap();
        assert_eq!(config.duration_ms, 40);
        assert!(config.looping);
        assert!(!config.auto_start);
        assert_eq!(config.background.as_deref(), Some("#000"));
        assert_eq!(config.scale, ScaleMode::Fit);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml_partial() {
        let config = PlayerConfig::from_toml_str("auto_start = true").unwrap();
        assert!(config.auto_start);
        assert_eq!(config.duration_ms, DEFAULT_DURATION_MS);
    }
}
