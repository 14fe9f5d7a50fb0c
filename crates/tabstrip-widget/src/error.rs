//! Tab widget error types

use tabstrip_scene::{NodeId, SceneError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Tab button to select is missing, index was {index}")]
    InvalidSelection { index: usize },

    #[error("Tab button already belongs to the group: {0}")]
    AlreadyInGroup(NodeId),

    #[error("Tab group node is missing: {0}")]
    GroupNodeMissing(NodeId),
}
