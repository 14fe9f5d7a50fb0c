//! Appearance strategies
//!
//! The group picks one strategy; every button runs it on each state change.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tabstrip_scene::{Color, ImageDisplay, Sprite};

use crate::button::TabButton;
use crate::state::ButtonState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeMode {
    /// No visual effect
    None,
    /// Tween the background color
    #[default]
    ColorFade,
    /// Swap the background sprite
    SpriteSwap,
    /// Hand the background image to a user callback
    CustomCallback,
}

impl FadeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FadeMode::None => "none",
            FadeMode::ColorFade => "color_fade",
            FadeMode::SpriteSwap => "sprite_swap",
            FadeMode::CustomCallback => "custom_callback",
        }
    }
}

impl std::fmt::Display for FadeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FadeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "none" => Ok(FadeMode::None),
            "color_fade" | "color" => Ok(FadeMode::ColorFade),
            "sprite_swap" | "sprite" => Ok(FadeMode::SpriteSwap),
            "custom_callback" | "custom" => Ok(FadeMode::CustomCallback),
            _ => Err(format!("Unknown fade mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorFade {
    /// Seconds; zero or less applies the color immediately.
    pub duration: f32,
    pub default: Color,
    pub hover: Color,
    pub selected: Color,
    pub disabled: Color,
    /// Fade to `current - target` instead of `target`, unless the target is
    /// the button's baseline color.
    pub subtract_from_current: bool,
}

impl ColorFade {
    pub fn target(&self, state: ButtonState) -> Color {
        match state {
            ButtonState::Reset => self.default,
            ButtonState::Hover => self.hover,
            ButtonState::Click => self.selected,
            ButtonState::Disable => self.disabled,
        }
    }
}

impl Default for ColorFade {
    fn default() -> Self {
        Self {
            duration: 0.15,
            default: Color::WHITE,
            hover: Color::gray(0.95),
            selected: Color::gray(0.9),
            disabled: Color::rgba(0.5, 0.5, 0.5, 0.5),
            subtract_from_current: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSwap {
    pub default: Option<Sprite>,
    pub hover: Option<Sprite>,
    pub selected: Option<Sprite>,
    pub disabled: Option<Sprite>,
}

impl SpriteSwap {
    pub fn target(&self, state: ButtonState) -> Option<&Sprite> {
        match state {
            ButtonState::Reset => self.default.as_ref(),
            ButtonState::Hover => self.hover.as_ref(),
            ButtonState::Click => self.selected.as_ref(),
            ButtonState::Disable => self.disabled.as_ref(),
        }
    }
}

/// Receives the button background image and the button itself.
pub type TransitionCallback = Arc<dyn Fn(&mut ImageDisplay, &TabButton) + Send + Sync>;

/// One callback slot per state. The callback owns the whole visual effect.
#[derive(Clone, Default)]
pub struct CustomTransition {
    pub reset: Option<TransitionCallback>,
    pub hover: Option<TransitionCallback>,
    pub click: Option<TransitionCallback>,
    pub disable: Option<TransitionCallback>,
}

impl CustomTransition {
    pub fn callback(&self, state: ButtonState) -> Option<&TransitionCallback> {
        match state {
            ButtonState::Reset => self.reset.as_ref(),
            ButtonState::Hover => self.hover.as_ref(),
            ButtonState::Click => self.click.as_ref(),
            ButtonState::Disable => self.disable.as_ref(),
        }
    }

    pub fn on(
        mut self,
        state: ButtonState,
        callback: impl Fn(&mut ImageDisplay, &TabButton) + Send + Sync + 'static,
    ) -> Self {
        let slot = match state {
            ButtonState::Reset => &mut self.reset,
            ButtonState::Hover => &mut self.hover,
            ButtonState::Click => &mut self.click,
            ButtonState::Disable => &mut self.disable,
        };
        *slot = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for CustomTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomTransition")
            .field("reset", &self.reset.is_some())
            .field("hover", &self.hover.is_some())
            .field("click", &self.click.is_some())
            .field("disable", &self.disable.is_some())
            .finish()
    }
}

/// Strategy selected by the fade mode, carrying only that mode's parameters.
#[derive(Debug, Clone)]
pub enum Transition {
    None,
    ColorFade(ColorFade),
    SpriteSwap(SpriteSwap),
    Custom(CustomTransition),
}

impl Transition {
    pub fn mode(&self) -> FadeMode {
        match self {
            Transition::None => FadeMode::None,
            Transition::ColorFade(_) => FadeMode::ColorFade,
            Transition::SpriteSwap(_) => FadeMode::SpriteSwap,
            Transition::Custom(_) => FadeMode::CustomCallback,
        }
    }

    /// Default parameters for a mode.
    pub fn for_mode(mode: FadeMode) -> Self {
        match mode {
            FadeMode::None => Transition::None,
            FadeMode::ColorFade => Transition::ColorFade(ColorFade::default()),
            FadeMode::SpriteSwap => Transition::SpriteSwap(SpriteSwap::default()),
            FadeMode::CustomCallback => Transition::Custom(CustomTransition::default()),
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Transition::ColorFade(ColorFade::default())
    }
}
