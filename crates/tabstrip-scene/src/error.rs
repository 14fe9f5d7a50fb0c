//! Scene error types

use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Cannot parent {child} under its own descendant {parent}")]
    CyclicParent { child: NodeId, parent: NodeId },
}
