//! Button appearance states
//!
//! Not a persistent machine: every pointer event or group directive
//! re-enters one of these four states.
//! ```text
//! Reset  <-> Hover
//!   |          |
//!   +-> Click <+
//! any -> Disable (group not interactable)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonState {
    /// Resting look of an unselected button
    #[default]
    Reset,
    /// Pointer is over an unselected button
    Hover,
    /// Pressed or selected
    Click,
    /// Group is not interactable
    Disable,
}

impl ButtonState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonState::Reset => "reset",
            ButtonState::Hover => "hover",
            ButtonState::Click => "click",
            ButtonState::Disable => "disable",
        }
    }

    /// Parse a state name, falling back to `Reset` for anything unknown.
    pub fn parse_or_reset(name: &str) -> ButtonState {
        name.parse().unwrap_or_else(|err| {
            tracing::warn!(state = %name, "{}, resetting instead", err);
            ButtonState::Reset
        })
    }
}

impl std::fmt::Display for ButtonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ButtonState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reset" | "default" => Ok(ButtonState::Reset),
            "hover" => Ok(ButtonState::Hover),
            "click" | "selected" => Ok(ButtonState::Click),
            "disable" | "disabled" => Ok(ButtonState::Disable),
            _ => Err(format!("No behaviour defined for state: {}", s)),
        }
    }
}
