//! Tab button
//!
//! One selectable child of a tab group. The button keeps its content
//! (label, icon), the baseline look captured on first activation and its
//! in-flight color tween. The owning group is referenced by node handle only.

use tabstrip_scene::{
    Color, Duplicate, ImageDisplay, NodeId, RectTransform, Scene, Sprite, TextAlignment,
    TextDisplay, Vec2,
};

use crate::state::ButtonState;
use crate::transition::{ColorFade, Transition};
use crate::tween::{ColorTween, TweenStep};
use crate::Result;

/// Label given to freshly created buttons.
pub const DEFAULT_LABEL: &str = "Tab Button";
pub const LABEL_NODE_NAME: &str = "Tab Text";
pub const ICON_NODE_NAME: &str = "Tab Image";
pub(crate) const BUTTON_NODE_NAME: &str = "Tab";

const COLOR_EPSILON: f32 = 1e-4;

/// Look of the background image when the button was first activated.
#[derive(Debug, Clone, PartialEq)]
struct Baseline {
    color: Color,
    sprite: Option<Sprite>,
}

#[derive(Debug, Clone)]
pub struct TabButton {
    /// Scene node carrying the background image
    node: NodeId,
    /// Node of the owning group; set once by `initialize`
    owner: Option<NodeId>,
    label_display: Option<NodeId>,
    icon_display: Option<NodeId>,
    label: String,
    icon: Option<Sprite>,
    /// Back-fill empty label/icon from what the displays already show
    content_passthrough: bool,
    interactable: bool,
    baseline: Option<Baseline>,
    appearance: ButtonState,
    tween: Option<ColorTween>,
    /// Owner lookup already failed once; stay inert until initialized
    recovery_failed: bool,
}

impl TabButton {
    fn with_node(node: NodeId) -> Self {
        Self {
            node,
            owner: None,
            label_display: None,
            icon_display: None,
            label: String::new(),
            icon: None,
            content_passthrough: false,
            interactable: true,
            baseline: None,
            appearance: ButtonState::Reset,
            tween: None,
            recovery_failed: false,
        }
    }

    /// Build a fresh button under `parent`: background image, centered label
    /// on the right two thirds and an icon on the left third.
    pub(crate) fn create_default(scene: &mut Scene, parent: NodeId) -> Result<Self> {
        let node = scene.spawn(BUTTON_NODE_NAME, Some(parent))?;
        {
            let button_node = scene.node_mut(node)?;
            button_node.rect.scale = Vec2::ONE;
            button_node.image = Some(ImageDisplay::default());
        }

        let label_node = scene.spawn(LABEL_NODE_NAME, Some(node))?;
        {
            let text_node = scene.node_mut(label_node)?;
            text_node.text = Some(TextDisplay {
                text: DEFAULT_LABEL.to_string(),
                color: Color::BLACK,
                alignment: TextAlignment::Center,
            });
            text_node.rect = RectTransform::stretched(Vec2::new(0.33, 0.0), Vec2::ONE);
        }

        let icon_node = scene.spawn(ICON_NODE_NAME, Some(node))?;
        {
            let image_node = scene.node_mut(icon_node)?;
            image_node.image = Some(ImageDisplay {
                preserve_aspect: true,
                ..ImageDisplay::default()
            });
            image_node.rect = RectTransform::stretched(Vec2::ZERO, Vec2::new(0.33, 1.0));
        }

        let mut button = Self {
            label_display: Some(label_node),
            icon_display: Some(icon_node),
            label: DEFAULT_LABEL.to_string(),
            ..Self::with_node(node)
        };
        button.generate_content(scene);

        Ok(button)
    }

    /// Wrap an existing node as an uninitialized button. The first child
    /// with a text display becomes the label, the first with an image the icon.
    pub fn from_node(scene: &Scene, node: NodeId) -> Result<Self> {
        scene.node(node)?;

        let find_child = |has: fn(&tabstrip_scene::Node) -> bool| {
            scene
                .children(node)
                .iter()
                .copied()
                .find(|c| scene.node(*c).is_ok_and(has))
        };

        Ok(Self {
            label_display: find_child(|n| n.text.is_some()),
            icon_display: find_child(|n| n.image.is_some()),
            ..Self::with_node(node)
        })
    }

    /// Copy of this button's configuration bound to a duplicated subtree.
    /// Runtime state (owner, baseline, tween) is not carried over.
    pub(crate) fn duplicated(&self, copy: &Duplicate) -> Self {
        Self {
            label_display: self.label_display.and_then(|n| copy.map(n)),
            icon_display: self.icon_display.and_then(|n| copy.map(n)),
            label: self.label.clone(),
            icon: self.icon.clone(),
            content_passthrough: self.content_passthrough,
            interactable: self.interactable,
            ..Self::with_node(copy.root)
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub fn is_initialized(&self) -> bool {
        self.owner.is_some()
    }

    /// Bind the button to its group. Later calls are ignored.
    pub fn initialize(&mut self, owner: NodeId) {
        if self.owner.is_some() {
            return;
        }

        self.owner = Some(owner);
        self.recovery_failed = false;
    }

    pub(crate) fn recovery_failed(&self) -> bool {
        self.recovery_failed
    }

    pub(crate) fn mark_recovery_failed(&mut self) {
        self.recovery_failed = true;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<&Sprite> {
        self.icon.as_ref()
    }

    pub fn label_display(&self) -> Option<NodeId> {
        self.label_display
    }

    pub fn icon_display(&self) -> Option<NodeId> {
        self.icon_display
    }

    pub fn appearance(&self) -> ButtonState {
        self.appearance
    }

    pub fn previous_color(&self) -> Option<Color> {
        self.baseline.as_ref().map(|b| b.color)
    }

    pub fn previous_sprite(&self) -> Option<&Sprite> {
        self.baseline.as_ref().and_then(|b| b.sprite.as_ref())
    }

    /// Local flag only; the group's interactability is ANDed on top.
    pub fn is_interactable_local(&self) -> bool {
        self.interactable
    }

    pub fn set_interactable_local(&mut self, interactable: bool) {
        self.interactable = interactable;
    }

    pub fn content_passthrough(&self) -> bool {
        self.content_passthrough
    }

    pub fn set_content_passthrough(&mut self, enabled: bool) {
        self.content_passthrough = enabled;
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }

    pub fn set_label(&mut self, scene: &mut Scene, label: impl Into<String>) {
        self.label = label.into();
        self.generate_content(scene);
    }

    pub fn set_icon(&mut self, scene: &mut Scene, icon: Option<Sprite>) {
        self.icon = icon;
        self.generate_content(scene);
    }

    /// Capture the baseline look once, on first activation.
    pub fn capture_baseline(&mut self, scene: &Scene) {
        if self.baseline.is_some() {
            return;
        }
        let Ok(node) = scene.node(self.node) else {
            return;
        };

        self.baseline = Some(match node.image.as_ref() {
            Some(image) => Baseline {
                color: image.color,
                sprite: image.sprite.clone(),
            },
            None => {
                tracing::warn!(node = %self.node, "Tab button has no background image");
                Baseline {
                    color: Color::WHITE,
                    sprite: None,
                }
            }
        });
    }

    /// Push label and icon into their displays, hiding a display with nothing to show.
    pub fn generate_content(&mut self, scene: &mut Scene) {
        let playing = scene.mode().is_playing();

        match self.label_display.and_then(|id| scene.node_mut(id).ok()) {
            Some(display_node) if display_node.text.is_some() => {
                let display = display_node.text.get_or_insert_with(TextDisplay::default);
                if !self.label.trim().is_empty() {
                    display.text = self.label.clone();
                    display_node.active = true;
                } else if self.content_passthrough && !display.text.trim().is_empty() {
                    self.label = display.text.clone();
                    display_node.active = true;
                } else {
                    display_node.active = false;
                }
            }
            _ => {
                if playing && !self.label.trim().is_empty() {
                    tracing::warn!(node = %self.node, "Label display of tab button is missing");
                }
            }
        }

        match self.icon_display.and_then(|id| scene.node_mut(id).ok()) {
            Some(display_node) if display_node.image.is_some() => {
                let display = display_node.image.get_or_insert_with(ImageDisplay::default);
                if let Some(icon) = &self.icon {
                    display.sprite = Some(icon.clone());
                    display_node.active = true;
                } else if self.content_passthrough && display.sprite.is_some() {
                    self.icon = display.sprite.clone();
                    display_node.active = true;
                } else {
                    display_node.active = false;
                }
            }
            _ => {
                if playing && self.icon.is_some() {
                    tracing::warn!(node = %self.node, "Icon display of tab button is missing");
                }
            }
        }
    }

    /// Run the group's transition for `state` on this button.
    pub fn apply_appearance(&mut self, scene: &mut Scene, transition: &Transition, state: ButtonState) {
        if !scene.contains(self.node) {
            return;
        }
        self.capture_baseline(scene);

        match transition {
            Transition::None => {}
            Transition::ColorFade(fade) => self.fade_color(scene, fade.target(state), fade),
            Transition::SpriteSwap(swap) => {
                let sprite = match state {
                    ButtonState::Reset | ButtonState::Disable if self.previous_sprite().is_none() => {
                        None
                    }
                    _ => swap.target(state).cloned(),
                };
                if let Some(image) = self.background_mut(scene) {
                    image.sprite = sprite;
                }
            }
            Transition::Custom(custom) => {
                if let Some(callback) = custom.callback(state) {
                    if let Some(image) = self.background_mut(scene) {
                        callback(image, &*self);
                    }
                }
            }
        }

        self.appearance = state;
        tracing::trace!(node = %self.node, state = %state, "Applied tab button appearance");
    }

    fn fade_color(&mut self, scene: &mut Scene, target: Color, fade: &ColorFade) {
        let Some(current) = self.background(scene).map(|image| image.color) else {
            return;
        };

        let is_baseline = self
            .previous_color()
            .is_some_and(|previous| previous.approx_eq(&target, COLOR_EPSILON));
        let target = if fade.subtract_from_current && !is_baseline {
            current - target
        } else {
            target
        };

        if !scene.is_active_in_hierarchy(self.node) {
            // Inactive buttons run nothing.
            self.tween = None;
            return;
        }

        if fade.duration <= 0.0 || !scene.mode().is_playing() {
            self.tween = None;
            if let Some(image) = self.background_mut(scene) {
                image.color = target;
            }
            return;
        }

        self.tween = Some(ColorTween::new(current, target, fade.duration));
    }

    /// Advance the in-flight tween by one frame. Returns true while still running.
    pub(crate) fn advance_tween(&mut self, scene: &mut Scene, dt: f32) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        let step = tween.advance(dt);

        let Some(image) = self.background_mut(scene) else {
            self.tween = None;
            return false;
        };
        image.color = step.color();

        match step {
            TweenStep::Running(_) => true,
            TweenStep::Finished(_) => {
                self.tween = None;
                false
            }
        }
    }

    pub(crate) fn cancel_tween(&mut self) {
        self.tween = None;
    }

    fn background<'s>(&self, scene: &'s Scene) -> Option<&'s ImageDisplay> {
        scene.node(self.node).ok().and_then(|n| n.image.as_ref())
    }

    fn background_mut<'s>(&self, scene: &'s mut Scene) -> Option<&'s mut ImageDisplay> {
        scene.node_mut(self.node).ok().and_then(|n| n.image.as_mut())
    }
}
