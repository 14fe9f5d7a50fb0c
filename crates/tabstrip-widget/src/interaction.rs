//! Pointer dispatch and ancestor interactability

use tabstrip_scene::{NodeId, Scene};

use crate::button::TabButton;
use crate::group::TabGroup;
use crate::state::ButtonState;

/// Receiver of pointer notifications from the host's event system.
pub trait PointerTarget {
    fn on_pointer_down(&mut self);
    fn on_pointer_enter(&mut self);
    fn on_pointer_exit(&mut self);
    /// The authoritative action.
    fn on_pointer_click(&mut self);
}

/// Something whose interactability depends on ancestor interaction groups.
pub trait AncestorInteractionAware {
    /// Called by the host whenever an ancestor interaction group changes.
    fn on_ancestor_groups_changed(&mut self, scene: &mut Scene);
}

/// Walk up from `node` through interaction groups. Stops at the first group
/// forbidding interaction or ignoring its parents.
pub fn ancestor_groups_allow(scene: &Scene, node: NodeId) -> bool {
    for id in scene.ancestors(node) {
        let Ok(current) = scene.node(id) else {
            break;
        };
        if let Some(group) = current.interaction_group {
            if !group.interactable {
                return false;
            }
            if group.ignore_parent_groups {
                break;
            }
        }
    }
    true
}

impl AncestorInteractionAware for TabGroup {
    fn on_ancestor_groups_changed(&mut self, scene: &mut Scene) {
        let allow = ancestor_groups_allow(scene, self.node);
        if allow != self.groups_allow_interaction {
            tracing::debug!(node = %self.node, allow, "Ancestor interaction changed");
            self.groups_allow_interaction = allow;
            self.refresh_appearances(scene);
        }
    }
}

impl TabGroup {
    /// Borrow the button at `node` for pointer dispatch.
    pub fn pointer_target<'a>(
        &'a mut self,
        scene: &'a mut Scene,
        node: NodeId,
    ) -> Option<TabButtonMut<'a>> {
        let index = self.index_of(node)?;
        Some(TabButtonMut {
            group: self,
            scene,
            index,
        })
    }
}

/// One button of a group together with the scene, as seen by pointer events.
pub struct TabButtonMut<'a> {
    group: &'a mut TabGroup,
    scene: &'a mut Scene,
    index: usize,
}

impl TabButtonMut<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn button(&self) -> &TabButton {
        &self.group.buttons[self.index]
    }

    /// Own flag ANDed with the group's effective interactability.
    pub fn is_interactable(&self) -> bool {
        self.group.is_interactable() && self.button().is_interactable_local()
    }

    pub fn is_selected(&self) -> bool {
        self.group.selected_node() == Some(self.button().node())
    }

    /// Make sure the button knows its group. An uninitialized button gets one
    /// attempt at finding the group among its ancestors; after a failure it
    /// stays inert until initialized.
    fn ensure_owner(&mut self) -> bool {
        let group_node = self.group.node;
        let button = &mut self.group.buttons[self.index];
        if button.is_initialized() {
            return true;
        }
        if button.recovery_failed() {
            return false;
        }

        tracing::warn!(
            node = %button.node(),
            "Tab button has no owning group, searching ancestors"
        );
        if self.scene.is_ancestor(group_node, button.node()) {
            button.initialize(group_node);
            return true;
        }

        tracing::warn!(
            node = %button.node(),
            "No owning tab group found among ancestors"
        );
        button.mark_recovery_failed();
        false
    }

    fn apply(&mut self, state: ButtonState) {
        let group = &mut *self.group;
        group.buttons[self.index].apply_appearance(self.scene, &group.transition, state);
    }
}

impl PointerTarget for TabButtonMut<'_> {
    /// Local preview only; the group is not told yet.
    fn on_pointer_down(&mut self) {
        if !self.ensure_owner() || !self.is_interactable() {
            return;
        }

        if !self.is_selected() {
            self.apply(ButtonState::Click);
        }
    }

    fn on_pointer_enter(&mut self) {
        if !self.ensure_owner() || !self.is_interactable() {
            return;
        }

        if !self.is_selected() {
            self.apply(ButtonState::Hover);
        }
    }

    fn on_pointer_exit(&mut self) {
        if !self.ensure_owner() || !self.is_interactable() {
            return;
        }

        if self.is_selected() {
            self.apply(ButtonState::Click);
        } else {
            self.apply(ButtonState::Reset);
        }
    }

    fn on_pointer_click(&mut self) {
        if !self.ensure_owner() || !self.is_interactable() {
            return;
        }

        let index = self.index;
        let node = self.button().node();
        self.group.notify_clicked(index);
        self.group.set_selected_button(node);
        self.group.refresh_appearances(self.scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{ColorFade, Transition};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tabstrip_scene::{Color, InteractionGroup};

    fn setup(count: i64) -> (Scene, NodeId, TabGroup) {
        let mut scene = Scene::new();
        let panel = scene.spawn("Panel", None).unwrap();
        let node = scene.spawn("Tab System", Some(panel)).unwrap();
        let transition = Transition::ColorFade(ColorFade {
            duration: 0.0,
            ..ColorFade::default()
        });
        let mut group = TabGroup::with_transition(&mut scene, node, transition).unwrap();
        group.set_declared_count(&mut scene, count).unwrap();
        group.start(&mut scene);
        (scene, panel, group)
    }

    fn node_at(group: &TabGroup, index: usize) -> NodeId {
        group.button(index).unwrap().node()
    }

    #[test]
    fn test_click_selects_and_notifies() {
        let (mut scene, _, mut group) = setup(3);
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicks);
        group.on_tab_clicked(move |index| sink.lock().push(index));

        let node = node_at(&group, 2);
        group
            .pointer_target(&mut scene, node)
            .unwrap()
            .on_pointer_click();

        assert_eq!(group.selected_index(), 2);
        assert_eq!(clicks.lock().as_slice(), &[2]);
        assert_eq!(group.button(2).unwrap().appearance(), ButtonState::Click);
        assert_eq!(group.button(0).unwrap().appearance(), ButtonState::Reset);
    }

    #[test]
    fn test_hover_and_exit_on_unselected() {
        let (mut scene, _, mut group) = setup(2);
        let node = node_at(&group, 1);

        let mut target = group.pointer_target(&mut scene, node).unwrap();
        target.on_pointer_enter();
        assert_eq!(target.button().appearance(), ButtonState::Hover);
        target.on_pointer_down();
        assert_eq!(target.button().appearance(), ButtonState::Click);
        target.on_pointer_exit();
        assert_eq!(target.button().appearance(), ButtonState::Reset);

        // Preview never moved the selection
        assert_eq!(group.selected_index(), 0);
    }

    #[test]
    fn test_selected_button_stays_pressed() {
        let (mut scene, _, mut group) = setup(2);
        let node = node_at(&group, 0);

        let mut target = group.pointer_target(&mut scene, node).unwrap();
        assert!(target.is_selected());
        target.on_pointer_enter();
        assert_eq!(target.button().appearance(), ButtonState::Click);
        target.on_pointer_exit();
        assert_eq!(target.button().appearance(), ButtonState::Click);
        assert_eq!(
            scene.node(node).unwrap().image.as_ref().unwrap().color,
            Color::gray(0.9)
        );
    }

    #[test]
    fn test_locally_disabled_button_ignores_pointer() {
        let (mut scene, _, mut group) = setup(2);
        group.button_mut(1).unwrap().set_interactable_local(false);
        let node = node_at(&group, 1);

        group
            .pointer_target(&mut scene, node)
            .unwrap()
            .on_pointer_click();
        assert_eq!(group.selected_index(), 0);
    }

    #[test]
    fn test_ancestor_group_forbids_interaction() {
        let (mut scene, panel, mut group) = setup(2);
        scene.node_mut(panel).unwrap().interaction_group = Some(InteractionGroup {
            interactable: false,
            ignore_parent_groups: false,
        });

        group.on_ancestor_groups_changed(&mut scene);
        assert!(!group.is_interactable());
        assert!(group.interactable_flag());
        assert!(group
            .buttons()
            .iter()
            .all(|b| b.appearance() == ButtonState::Disable));

        let node = node_at(&group, 1);
        group
            .pointer_target(&mut scene, node)
            .unwrap()
            .on_pointer_click();
        assert_eq!(group.selected_index(), 0);
    }

    #[test]
    fn test_ignore_parent_groups_stops_walk() {
        let mut scene = Scene::new();
        let outer = scene.spawn("Outer", None).unwrap();
        let inner = scene.spawn("Inner", Some(outer)).unwrap();
        let leaf = scene.spawn("Leaf", Some(inner)).unwrap();
        scene.node_mut(outer).unwrap().interaction_group = Some(InteractionGroup {
            interactable: false,
            ignore_parent_groups: false,
        });
        assert!(!ancestor_groups_allow(&scene, leaf));

        scene.node_mut(inner).unwrap().interaction_group = Some(InteractionGroup {
            interactable: true,
            ignore_parent_groups: true,
        });
        assert!(ancestor_groups_allow(&scene, leaf));
    }

    #[test]
    fn test_uninitialized_button_recovers_owner() {
        let (mut scene, _, mut group) = setup(1);
        let loose = scene.spawn("Tab_custom", Some(group.node())).unwrap();
        scene.node_mut(loose).unwrap().image = Some(Default::default());
        group.adopt(&scene, loose).unwrap();

        group
            .pointer_target(&mut scene, loose)
            .unwrap()
            .on_pointer_click();

        assert_eq!(group.button(1).unwrap().owner(), Some(group.node()));
        assert_eq!(group.selected_index(), 1);
    }

    #[test]
    fn test_orphan_button_stays_inert() {
        let (mut scene, _, mut group) = setup(1);
        let elsewhere = scene.spawn("Elsewhere", None).unwrap();
        group.adopt(&scene, elsewhere).unwrap();

        let mut target = group.pointer_target(&mut scene, elsewhere).unwrap();
        target.on_pointer_click();
        target.on_pointer_click();
        assert!(!target.button().is_initialized());
        assert_eq!(group.selected_index(), 0);

        // Resolved by an explicit initialize
        let group_node = group.node();
        group.button_mut(1).unwrap().initialize(group_node);
        group
            .pointer_target(&mut scene, elsewhere)
            .unwrap()
            .on_pointer_click();
        assert_eq!(group.selected_index(), 1);
    }

    #[test]
    fn test_unknown_node_has_no_target() {
        let (mut scene, _, mut group) = setup(1);
        let other = scene.spawn("Other", None).unwrap();
        assert!(group.pointer_target(&mut scene, other).is_none());
    }
}
