//! Scene node and the display components a node can carry

use serde::{Deserialize, Serialize};

use crate::color::{Color, Sprite};
use crate::scene::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Anchoring rectangle relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectTransform {
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub offset_min: Vec2,
    pub offset_max: Vec2,
    pub size: Vec2,
    pub scale: Vec2,
}

impl RectTransform {
    /// Stretch between two anchors with zero offsets.
    pub fn stretched(anchor_min: Vec2, anchor_max: Vec2) -> Self {
        Self {
            anchor_min,
            anchor_max,
            ..Self::default()
        }
    }
}

impl Default for RectTransform {
    fn default() -> Self {
        Self {
            anchor_min: Vec2::new(0.5, 0.5),
            anchor_max: Vec2::new(0.5, 0.5),
            offset_min: Vec2::ZERO,
            offset_max: Vec2::ZERO,
            size: Vec2::new(100.0, 100.0),
            scale: Vec2::ONE,
        }
    }
}

/// Image drawn by the host: background of a button or an icon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageDisplay {
    pub color: Color,
    pub sprite: Option<Sprite>,
    pub preserve_aspect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDisplay {
    pub text: String,
    pub color: Color,
    pub alignment: TextAlignment,
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Color::BLACK,
            alignment: TextAlignment::Left,
        }
    }
}

/// Ancestor control that can forbid interaction for a whole subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionGroup {
    pub interactable: bool,
    /// Stops the ancestor walk at this group.
    pub ignore_parent_groups: bool,
}

impl Default for InteractionGroup {
    fn default() -> Self {
        Self {
            interactable: true,
            ignore_parent_groups: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    ScreenSpaceOverlay,
    ScreenSpaceCamera,
    WorldSpace,
}

/// Display surface root. Widgets must live under one to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Canvas {
    pub render_mode: RenderMode,
    pub scaler: bool,
    pub raycaster: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalLayout {
    pub spacing: f32,
    pub child_control_width: bool,
    pub child_control_height: bool,
}

impl Default for HorizontalLayout {
    fn default() -> Self {
        Self {
            spacing: 0.0,
            child_control_width: false,
            child_control_height: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Local active flag; see `Scene::is_active_in_hierarchy`.
    pub active: bool,
    pub rect: RectTransform,
    pub image: Option<ImageDisplay>,
    pub text: Option<TextDisplay>,
    pub interaction_group: Option<InteractionGroup>,
    pub canvas: Option<Canvas>,
    pub layout: Option<HorizontalLayout>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name,
            parent,
            children: Vec::new(),
            active: true,
            rect: RectTransform::default(),
            image: None,
            text: None,
            interaction_group: None,
            canvas: None,
            layout: None,
        }
    }
}
