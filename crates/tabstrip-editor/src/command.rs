//! Inspector command set
//!
//! Every field write and button of the tab group inspector maps to one
//! command. Textual forms:
//! - `count 3`, `count +`, `count -`
//! - `reference 1`, `select 2`
//! - `interactable on|off`
//! - `fade color|sprite|custom|none`
//! - `clear`, `clear keep`, `clear all`, `generate`, `reset`

use serde::{Deserialize, Serialize};

use tabstrip_widget::FadeMode;

use crate::{EditorError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectorCommand {
    SetTabCount(i64),
    IncrementTabCount,
    DecrementTabCount,
    SetReferenceIndex(i64),
    SetSelectedIndex(i64),
    SetInteractable(bool),
    SetFadeMode(FadeMode),
    ClearTabs { reset_count: bool, clear_all: bool },
    GenerateTabs,
    ResetTabs,
}

impl InspectorCommand {
    /// Plain "Clear Tabs" button: resets the count, keeps the first button.
    pub const CLEAR: InspectorCommand = InspectorCommand::ClearTabs {
        reset_count: true,
        clear_all: false,
    };

    /// Parse one command line.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let mut parts = input.splitn(2, ' ');
        let command = parts.next().unwrap_or_default().to_lowercase();
        let argument = parts
            .next()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let invalid = |argument: &str| EditorError::InvalidArgument {
            command: command.clone(),
            argument: argument.to_string(),
        };
        let index = |argument: Option<&str>| -> Result<i64> {
            let argument = argument.unwrap_or_default();
            argument.parse::<i64>().map_err(|_| invalid(argument))
        };

        let parsed = match command.as_str() {
            "count" | "tabs" | "n" => match argument.as_deref() {
                Some("+") => InspectorCommand::IncrementTabCount,
                Some("-") => InspectorCommand::DecrementTabCount,
                other => InspectorCommand::SetTabCount(index(other)?),
            },
            "reference" | "ref" => InspectorCommand::SetReferenceIndex(index(argument.as_deref())?),
            "select" | "selected" => InspectorCommand::SetSelectedIndex(index(argument.as_deref())?),
            "interactable" => match argument.as_deref() {
                Some("on" | "true" | "yes" | "1") | None => InspectorCommand::SetInteractable(true),
                Some("off" | "false" | "no" | "0") => InspectorCommand::SetInteractable(false),
                Some(other) => return Err(invalid(other)),
            },
            "fade" => {
                let argument = argument.unwrap_or_default();
                let mode = argument.parse::<FadeMode>().map_err(|_| invalid(&argument))?;
                InspectorCommand::SetFadeMode(mode)
            }
            "clear" => match argument.as_deref() {
                None => Self::CLEAR,
                Some("keep") => InspectorCommand::ClearTabs {
                    reset_count: false,
                    clear_all: false,
                },
                Some("all") => InspectorCommand::ClearTabs {
                    reset_count: true,
                    clear_all: true,
                },
                Some(other) => return Err(invalid(other)),
            },
            "generate" => InspectorCommand::GenerateTabs,
            "reset" => InspectorCommand::ResetTabs,
            _ => return Err(EditorError::UnknownCommand(input.to_string())),
        };

        Ok(parsed)
    }

    /// Name of the undo group the command is recorded under.
    pub fn label(&self) -> &'static str {
        match self {
            InspectorCommand::SetTabCount(_)
            | InspectorCommand::IncrementTabCount
            | InspectorCommand::DecrementTabCount
            | InspectorCommand::SetReferenceIndex(_)
            | InspectorCommand::SetSelectedIndex(_)
            | InspectorCommand::SetInteractable(_) => "change variable on TabSystem",
            InspectorCommand::SetFadeMode(_) => "change fade mode on TabSystem",
            InspectorCommand::ClearTabs { .. } => "clear tabs on TabSystem",
            InspectorCommand::GenerateTabs => "generate tabs on TabSystem",
            InspectorCommand::ResetTabs => "reset tabs on TabSystem",
        }
    }

    /// Whether the command creates or destroys button nodes.
    pub fn is_generative(&self) -> bool {
        matches!(
            self,
            InspectorCommand::SetTabCount(_)
                | InspectorCommand::IncrementTabCount
                | InspectorCommand::DecrementTabCount
                | InspectorCommand::ClearTabs { .. }
                | InspectorCommand::GenerateTabs
                | InspectorCommand::ResetTabs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_forms() {
        assert_eq!(
            InspectorCommand::parse("count 3").unwrap(),
            InspectorCommand::SetTabCount(3)
        );
        assert_eq!(
            InspectorCommand::parse("  COUNT +").unwrap(),
            InspectorCommand::IncrementTabCount
        );
        assert_eq!(
            InspectorCommand::parse("n -").unwrap(),
            InspectorCommand::DecrementTabCount
        );
        assert_eq!(
            InspectorCommand::parse("count -4").unwrap(),
            InspectorCommand::SetTabCount(-4)
        );
    }

    #[test]
    fn test_parse_clear_variants() {
        assert_eq!(InspectorCommand::parse("clear").unwrap(), InspectorCommand::CLEAR);
        assert_eq!(
            InspectorCommand::parse("clear all").unwrap(),
            InspectorCommand::ClearTabs {
                reset_count: true,
                clear_all: true
            }
        );
        assert!(InspectorCommand::parse("clear everything").is_err());
    }

    #[test]
    fn test_parse_fade_and_flags() {
        assert_eq!(
            InspectorCommand::parse("fade sprite").unwrap(),
            InspectorCommand::SetFadeMode(FadeMode::SpriteSwap)
        );
        assert_eq!(
            InspectorCommand::parse("interactable off").unwrap(),
            InspectorCommand::SetInteractable(false)
        );
        assert_eq!(
            InspectorCommand::parse("select 2").unwrap(),
            InspectorCommand::SetSelectedIndex(2)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            InspectorCommand::parse("explode"),
            Err(EditorError::UnknownCommand(_))
        ));
        assert!(matches!(
            InspectorCommand::parse("select two"),
            Err(EditorError::InvalidArgument { .. })
        ));
        assert!(matches!(
            InspectorCommand::parse("count"),
            Err(EditorError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            InspectorCommand::ResetTabs.label(),
            "reset tabs on TabSystem"
        );
        assert_eq!(
            InspectorCommand::SetSelectedIndex(0).label(),
            "change variable on TabSystem"
        );
        assert!(InspectorCommand::GenerateTabs.is_generative());
        assert!(!InspectorCommand::SetInteractable(true).is_generative());
    }
}
