//! Editor error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument for {command}: {argument}")]
    InvalidArgument { command: String, argument: String },

    #[error("Tab error: {0}")]
    Tab(#[from] tabstrip_widget::TabError),

    #[error("Scene error: {0}")]
    Scene(#[from] tabstrip_scene::SceneError),
}
