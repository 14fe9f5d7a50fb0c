//! `UI / Tab System` creation command

use tabstrip_scene::{Canvas, HorizontalLayout, NodeId, RenderMode, Scene, Vec2};
use tabstrip_widget::{TabGroup, Transition, DEFAULT_LABEL};

use crate::Result;

pub const GROUP_NODE_NAME: &str = "Tab System";
pub const CANVAS_NODE_NAME: &str = "Canvas";

/// Settings a freshly created group starts with.
#[derive(Debug, Clone)]
pub struct GroupTemplate {
    pub transition: Transition,
    pub label: String,
    pub tab_count: i64,
}

impl Default for GroupTemplate {
    fn default() -> Self {
        Self {
            transition: Transition::default(),
            label: DEFAULT_LABEL.to_string(),
            tab_count: 1,
        }
    }
}

#[derive(Debug)]
pub struct CreatedGroup {
    /// Display surface the group was parented to.
    pub canvas: NodeId,
    /// Whether `canvas` had to be created.
    pub created_canvas: bool,
    pub node: NodeId,
    pub group: TabGroup,
}

/// Create a tab group pre-wired with one button and a horizontal layout.
///
/// The parent is `context` if it sits under a canvas, otherwise the first
/// canvas in the scene, otherwise a new screen-space canvas at the root.
pub fn create_tab_group(
    scene: &mut Scene,
    context: Option<NodeId>,
    template: &GroupTemplate,
) -> Result<CreatedGroup> {
    let (parent, canvas, created_canvas) = match context
        .and_then(|c| scene.find_canvas_ancestor(c).map(|canvas| (c, canvas)))
    {
        Some((context, canvas)) => (context, canvas, false),
        None => match scene.find_first_canvas() {
            Some(canvas) => (canvas, canvas, false),
            None => {
                let canvas = spawn_canvas(scene)?;
                (canvas, canvas, true)
            }
        },
    };

    let node = scene.spawn(GROUP_NODE_NAME, Some(parent))?;
    {
        let group_node = scene.node_mut(node)?;
        group_node.layout = Some(HorizontalLayout {
            spacing: 10.0,
            child_control_width: true,
            child_control_height: true,
        });
        group_node.rect.size = Vec2::new(200.0, 100.0);
    }

    let mut group = TabGroup::with_transition(scene, node, template.transition.clone())?;
    if template.label != DEFAULT_LABEL {
        for index in 0..group.len() {
            if let Some(button) = group.button_mut(index) {
                button.set_label(scene, template.label.clone());
            }
        }
    }
    if template.tab_count != 1 {
        group.set_declared_count(scene, template.tab_count)?;
    }

    tracing::info!(
        node = %node,
        canvas = %canvas,
        created_canvas,
        tabs = group.len(),
        "Created tab group"
    );

    Ok(CreatedGroup {
        canvas,
        created_canvas,
        node,
        group,
    })
}

fn spawn_canvas(scene: &mut Scene) -> Result<NodeId> {
    let canvas = scene.spawn(CANVAS_NODE_NAME, None)?;
    scene.node_mut(canvas)?.canvas = Some(Canvas {
        render_mode: RenderMode::ScreenSpaceOverlay,
        scaler: true,
        raycaster: true,
    });

    tracing::debug!(node = %canvas, "Created canvas for tab group");
    Ok(canvas)
}
