//! Stage: owner of the scene and every tab group in it
//!
//! The host routes pointer events and frame ticks here; the inspector
//! surface routes its commands here.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use tabstrip_editor::{create_tab_group, Inspector, InspectorCommand, InspectorView};
use tabstrip_scene::{HostMode, InteractionGroup, NodeId, Scene};
use tabstrip_widget::{AncestorInteractionAware, PointerTarget, TabGroup};

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

/// Pointer notification delivered by the host's event system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEvent {
    Down,
    Enter,
    Exit,
    Click,
}

#[derive(Debug)]
struct StageState {
    scene: Scene,
    groups: HashMap<NodeId, TabGroup>,
    inspector: Inspector,
}

pub struct Stage {
    config: Config,
    state: Arc<RwLock<StageState>>,
}

impl Stage {
    pub fn new(config: Config) -> Self {
        let state = StageState {
            scene: Scene::with_mode(config.host_mode),
            groups: HashMap::new(),
            inspector: Inspector::with_limit(config.history_limit),
        };

        tracing::info!(mode = ?config.host_mode, "Stage initialized");
        Self {
            config,
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // === Scene ===

    pub fn with_scene<R>(&self, f: impl FnOnce(&Scene) -> R) -> R {
        f(&self.state.read().scene)
    }

    /// Direct scene access for host-side edits (activating nodes, ...).
    pub fn with_scene_mut<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        f(&mut self.state.write().scene)
    }

    pub fn mode(&self) -> HostMode {
        self.state.read().scene.mode()
    }

    pub fn set_mode(&self, mode: HostMode) {
        self.state.write().scene.set_mode(mode);
        tracing::debug!(mode = ?mode, "Host mode changed");
    }

    // === Groups ===

    /// Run the creation menu command and start the new group.
    pub fn create_tab_group(&self, context: Option<NodeId>) -> Result<NodeId> {
        let mut state = self.state.write();
        let StageState { scene, groups, .. } = &mut *state;

        let mut created = create_tab_group(scene, context, &self.config.template())?;
        created.group.start(scene);
        groups.insert(created.node, created.group);

        Ok(created.node)
    }

    pub fn group_ids(&self) -> Vec<NodeId> {
        self.state.read().groups.keys().copied().collect()
    }

    /// Snapshot of a group.
    pub fn group(&self, id: NodeId) -> Result<TabGroup> {
        self.state
            .read()
            .groups
            .get(&id)
            .cloned()
            .ok_or(CoreError::GroupNotFound(id))
    }

    /// Mutate a group together with the scene it lives in.
    pub fn group_mut<R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&mut Scene, &mut TabGroup) -> R,
    ) -> Result<R> {
        let mut state = self.state.write();
        let StageState { scene, groups, .. } = &mut *state;
        let group = groups.get_mut(&id).ok_or(CoreError::GroupNotFound(id))?;
        Ok(f(scene, group))
    }

    /// Destroy a group, its buttons and its undo history.
    pub fn remove_group(&self, id: NodeId) -> Result<()> {
        let mut state = self.state.write();
        let group = state.groups.remove(&id).ok_or(CoreError::GroupNotFound(id))?;
        group.destroy(&mut state.scene);
        state.inspector.forget(id);
        Ok(())
    }

    // === Host events ===

    /// Route a pointer event to the group owning `node`. Returns false when
    /// no group owns it.
    pub fn pointer(&self, node: NodeId, event: PointerEvent) -> bool {
        let mut state = self.state.write();
        let StageState { scene, groups, .. } = &mut *state;

        let Some(group) = groups.values_mut().find(|g| g.index_of(node).is_some()) else {
            tracing::trace!(node = %node, "Pointer event on a node without tab group");
            return false;
        };
        let Some(mut target) = group.pointer_target(scene, node) else {
            return false;
        };

        match event {
            PointerEvent::Down => target.on_pointer_down(),
            PointerEvent::Enter => target.on_pointer_enter(),
            PointerEvent::Exit => target.on_pointer_exit(),
            PointerEvent::Click => target.on_pointer_click(),
        }
        true
    }

    /// One rendered frame. Returns how many tweens are still running.
    pub fn tick(&self, dt: f32) -> usize {
        let mut state = self.state.write();
        let StageState { scene, groups, .. } = &mut *state;
        groups.values_mut().map(|g| g.tick(scene, dt)).sum()
    }

    /// Set or remove an interaction group and tell every tab group.
    pub fn set_interaction_group(
        &self,
        node: NodeId,
        interaction_group: Option<InteractionGroup>,
    ) -> Result<()> {
        let mut state = self.state.write();
        let StageState { scene, groups, .. } = &mut *state;

        scene.node_mut(node)?.interaction_group = interaction_group;
        for group in groups.values_mut() {
            group.on_ancestor_groups_changed(scene);
        }
        Ok(())
    }

    // === Inspector ===

    /// Apply one inspector command as a single undo step.
    pub fn inspect(&self, id: NodeId, command: &InspectorCommand) -> Result<bool> {
        let mut state = self.state.write();
        let StageState {
            scene,
            groups,
            inspector,
        } = &mut *state;
        let group = groups.get_mut(&id).ok_or(CoreError::GroupNotFound(id))?;

        Ok(inspector.apply(scene, group, command)?)
    }

    /// Parse and apply a textual inspector command.
    pub fn inspect_line(&self, id: NodeId, line: &str) -> Result<bool> {
        let command = InspectorCommand::parse(line)?;
        self.inspect(id, &command)
    }

    pub fn undo(&self, id: NodeId) -> Result<Option<String>> {
        let mut state = self.state.write();
        let StageState {
            scene,
            groups,
            inspector,
        } = &mut *state;
        let group = groups.get_mut(&id).ok_or(CoreError::GroupNotFound(id))?;

        Ok(inspector.undo(scene, group)?)
    }

    pub fn redo(&self, id: NodeId) -> Result<Option<String>> {
        let mut state = self.state.write();
        let StageState {
            scene,
            groups,
            inspector,
        } = &mut *state;
        let group = groups.get_mut(&id).ok_or(CoreError::GroupNotFound(id))?;

        Ok(inspector.redo(scene, group)?)
    }

    pub fn view(&self, id: NodeId) -> Result<InspectorView> {
        let state = self.state.read();
        let group = state.groups.get(&id).ok_or(CoreError::GroupNotFound(id))?;
        Ok(InspectorView::of(&state.scene, group))
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
