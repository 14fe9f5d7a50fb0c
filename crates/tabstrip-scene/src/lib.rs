//! Tabstrip Scene
//!
//! Minimal retained-mode host model the widgets mutate.
//! Holds hierarchy, active flags and display components; no layout, no rendering.

mod color;
mod components;
mod error;
mod scene;

pub use color::{Color, Sprite};
pub use components::{
    Canvas, HorizontalLayout, ImageDisplay, InteractionGroup, Node, RectTransform, RenderMode,
    TextAlignment, TextDisplay, Vec2,
};
pub use error::SceneError;
pub use scene::{Ancestors, Duplicate, HostMode, NodeId, Scene, Subtree};

pub type Result<T> = std::result::Result<T, SceneError>;
