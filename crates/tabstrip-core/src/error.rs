//! Core error types

use thiserror::Error;

use tabstrip_scene::NodeId;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Scene error: {0}")]
    Scene(#[from] tabstrip_scene::SceneError),

    #[error("Tab error: {0}")]
    Tab(#[from] tabstrip_widget::TabError),

    #[error("Editor error: {0}")]
    Editor(#[from] tabstrip_editor::EditorError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No tab group on node {0}")]
    GroupNotFound(NodeId),
}
