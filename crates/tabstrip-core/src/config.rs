//! Stage configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use tabstrip_editor::GroupTemplate;
use tabstrip_scene::HostMode;
use tabstrip_widget::{
    ColorFade, CustomTransition, FadeMode, SpriteSwap, Transition, DEFAULT_LABEL, MAX_TABS,
};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transition new groups start with
    pub fade_mode: FadeMode,
    /// Parameters used when `fade_mode` is `color_fade`
    pub color_fade: ColorFade,
    /// Parameters used when `fade_mode` is `sprite_swap`
    pub sprite_swap: SpriteSwap,
    /// Label of freshly created buttons
    pub label: String,
    /// Tab count of freshly created groups
    pub tab_count: i64,
    pub host_mode: HostMode,
    /// Undo entries kept by the inspector
    pub history_limit: usize,
}

impl Config {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;

        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.color_fade.duration.is_finite() || self.color_fade.duration < 0.0 {
            return Err(CoreError::Config(format!(
                "fade duration must be a non-negative number, got {}",
                self.color_fade.duration
            )));
        }
        if self.tab_count < 0 || self.tab_count > MAX_TABS as i64 {
            return Err(CoreError::Config(format!(
                "tab count must be within 0..={}, got {}",
                MAX_TABS, self.tab_count
            )));
        }
        Ok(())
    }

    /// Widget transition for the configured fade mode. Custom callbacks
    /// cannot come from a file and start empty.
    pub fn transition(&self) -> Transition {
        match self.fade_mode {
            FadeMode::None => Transition::None,
            FadeMode::ColorFade => Transition::ColorFade(self.color_fade.clone()),
            FadeMode::SpriteSwap => Transition::SpriteSwap(self.sprite_swap.clone()),
            FadeMode::CustomCallback => Transition::Custom(CustomTransition::default()),
        }
    }

    pub fn template(&self) -> GroupTemplate {
        GroupTemplate {
            transition: self.transition(),
            label: self.label.clone(),
            tab_count: self.tab_count,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fade_mode: FadeMode::ColorFade,
            color_fade: ColorFade::default(),
            sprite_swap: SpriteSwap::default(),
            label: DEFAULT_LABEL.to_string(),
            tab_count: 1,
            host_mode: HostMode::Playing,
            history_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstrip_scene::{Color, Sprite};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("tabstrip-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_defaults_mirror_widget() {
        let config = Config::default();
        assert_eq!(config.color_fade.duration, 0.15);
        assert_eq!(config.color_fade.hover, Color::gray(0.95));
        assert_eq!(config.label, "Tab Button");
        assert!(matches!(config.transition(), Transition::ColorFade(_)));
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let path = temp_path("partial.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{ "fade_mode": "sprite_swap", "sprite_swap": { "hover": { "name": "glow" } } }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.fade_mode, FadeMode::SpriteSwap);
        assert_eq!(config.tab_count, 1);
        match config.transition() {
            Transition::SpriteSwap(swap) => assert_eq!(swap.hover, Some(Sprite::new("glow"))),
            other => panic!("unexpected transition {:?}", other),
        }
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("nested/config.json");
        let config = Config {
            tab_count: 4,
            host_mode: HostMode::Editing,
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let config = Config {
            tab_count: -1,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = Config::default();
        config.color_fade.duration = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Config::load(temp_path("absent.json"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
