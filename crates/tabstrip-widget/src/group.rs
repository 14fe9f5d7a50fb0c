//! Tab group
//!
//! Owns the button list and reconciles it against the declared count.
//! Index in the list is the visual order: buttons are only ever appended at
//! the tail and destroyed from the tail.
//!
//! A declared count of zero disables the widget. The first button is then
//! hidden and parked rather than destroyed, so raising the count again
//! brings back the very same button.

use tabstrip_scene::{NodeId, Scene};

use crate::button::TabButton;
use crate::error::TabError;
use crate::events::TabEvents;
use crate::state::ButtonState;
use crate::transition::Transition;
use crate::Result;

/// Upper bound for the declared count.
pub const MAX_TABS: usize = u16::MAX as usize;

#[derive(Debug, Clone)]
pub struct TabGroup {
    /// Scene node the group is attached to; parent of fresh buttons
    pub(crate) node: NodeId,
    declared_count: usize,
    reference_index: usize,
    selected_index: usize,
    pub(crate) buttons: Vec<TabButton>,
    /// Hidden first button while the group is disabled
    dormant: Option<TabButton>,
    pub(crate) transition: Transition,
    interactable: bool,
    /// Result of the last ancestor interaction-group walk
    pub(crate) groups_allow_interaction: bool,
    pub(crate) events: TabEvents,
}

impl TabGroup {
    /// Attach a group to `node` and generate its first button.
    pub fn new(scene: &mut Scene, node: NodeId) -> Result<Self> {
        Self::with_transition(scene, node, Transition::default())
    }

    pub fn with_transition(scene: &mut Scene, node: NodeId, transition: Transition) -> Result<Self> {
        if !scene.contains(node) {
            return Err(TabError::GroupNodeMissing(node));
        }

        let mut group = Self {
            node,
            declared_count: 1,
            reference_index: 0,
            selected_index: 0,
            buttons: Vec::new(),
            dormant: None,
            transition,
            interactable: true,
            groups_allow_interaction: crate::interaction::ancestor_groups_allow(scene, node),
            events: TabEvents::default(),
        };
        group.generate_tabs(scene)?;

        tracing::info!(node = %node, "Attached tab group");

        Ok(group)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    // === Count & reconciliation ===

    pub fn declared_count(&self) -> usize {
        self.declared_count
    }

    /// Number of live buttons in the list.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// A declared count of zero disables the widget.
    pub fn is_disabled(&self) -> bool {
        self.declared_count == 0
    }

    /// Set the declared count, clamped to `[0, MAX_TABS]`, and reconcile.
    pub fn set_declared_count(&mut self, scene: &mut Scene, count: i64) -> Result<()> {
        let previous = self.declared_count;
        let count = count.clamp(0, MAX_TABS as i64) as usize;
        if previous == count {
            return Ok(());
        }

        self.declared_count = count;
        tracing::debug!(node = %self.node, previous, count, "Tab count changed");
        self.reconcile(scene, previous)
    }

    fn reconcile(&mut self, scene: &mut Scene, previous: usize) -> Result<()> {
        self.purge_stale(scene);

        if self.buttons.is_empty() && self.dormant.is_none() {
            return self.generate_tabs(scene);
        }

        if self.declared_count == 0 {
            return self.disable(scene);
        }

        if previous == 0 {
            if let Some(first) = self.dormant.take() {
                self.revive(scene, first, true)?;
            }
        }

        self.generate_tabs(scene)
    }

    /// Hide the first button, destroy the rest.
    fn disable(&mut self, scene: &mut Scene) -> Result<()> {
        if self.buttons.is_empty() {
            return Ok(());
        }

        let mut first = self.buttons.remove(0);
        while let Some(button) = self.buttons.pop() {
            scene.destroy(button.node());
        }

        first.cancel_tween();
        scene.set_active(first.node(), false)?;
        self.dormant = Some(first);

        tracing::debug!(node = %self.node, "Tab group disabled");
        Ok(())
    }

    /// Put the parked first button back at index 0.
    fn revive(&mut self, scene: &mut Scene, mut first: TabButton, announce: bool) -> Result<()> {
        scene.set_active(first.node(), true)?;
        first.initialize(self.node);
        self.buttons.insert(0, first);

        // Listeners that only track creation need to see the first button again.
        if announce {
            self.events.emit_created(0, &self.buttons[0]);
        }
        Ok(())
    }

    /// Converge the list to the declared count: destroy from the tail, then
    /// append new buttons.
    pub fn generate_tabs(&mut self, scene: &mut Scene) -> Result<()> {
        while self.buttons.len() > self.declared_count {
            if let Some(button) = self.buttons.pop() {
                scene.destroy(button.node());
            }
        }

        while self.buttons.len() < self.declared_count {
            self.create_tab(scene, true)?;
        }

        Ok(())
    }

    /// Create and append one button, cloning the reference button when asked
    /// and available. Returns the new button's node.
    pub fn create_tab(&mut self, scene: &mut Scene, use_reference: bool) -> Result<NodeId> {
        let reference = if use_reference {
            self.buttons.get(self.reference_index())
        } else {
            None
        };

        let mut button = match reference {
            Some(reference) if scene.contains(reference.node()) => {
                let parent = scene.parent(reference.node());
                let copy = scene.duplicate(reference.node(), parent)?;
                reference.duplicated(&copy)
            }
            Some(reference) => {
                tracing::debug!(
                    node = %reference.node(),
                    "Reference tab button is gone, creating a fresh one"
                );
                TabButton::create_default(scene, self.node)?
            }
            None => TabButton::create_default(scene, self.node)?,
        };

        let index = self.buttons.len();
        button.initialize(self.node);
        let node = button.node();
        let name = indexed_name(&scene.node(node)?.name, index);
        scene.node_mut(node)?.name = name;

        self.buttons.push(button);
        self.events.emit_created(index, &self.buttons[index]);

        Ok(node)
    }

    /// Destroy every button except the first (or all of them with `clear_all`).
    /// `reset_count` sets the declared count to 1 without reconciling.
    pub fn clear_tabs(&mut self, scene: &mut Scene, reset_count: bool, clear_all: bool) -> Result<()> {
        self.purge_stale(scene);

        if clear_all {
            if let Some(first) = self.dormant.take() {
                scene.destroy(first.node());
            }
        } else if self.buttons.is_empty() {
            if let Some(first) = self.dormant.take() {
                self.revive(scene, first, false)?;
            }
        }

        let keep = if clear_all { 0 } else { 1 };
        while self.buttons.len() > keep {
            if let Some(button) = self.buttons.pop() {
                scene.destroy(button.node());
            }
        }

        if let Some(first) = self.buttons.first_mut() {
            first.initialize(self.node);
        }

        if reset_count {
            self.declared_count = 1;
        }

        tracing::debug!(node = %self.node, reset_count, clear_all, "Cleared tabs");
        Ok(())
    }

    /// Hard reset: drop every button and stray child, then start over with
    /// one fresh button.
    pub fn reset_tabs(&mut self, scene: &mut Scene) -> Result<()> {
        self.clear_tabs(scene, true, true)?;

        for child in scene.children(self.node).to_vec() {
            scene.destroy(child);
        }

        self.selected_index = 0;
        self.create_tab(scene, false)?;

        tracing::debug!(node = %self.node, "Reset tabs");
        Ok(())
    }

    /// Drop list entries whose node no longer exists.
    pub fn purge_stale(&mut self, scene: &Scene) {
        let before = self.buttons.len();
        self.buttons.retain(|b| scene.contains(b.node()));
        if self.dormant.as_ref().is_some_and(|b| !scene.contains(b.node())) {
            self.dormant = None;
        }

        let removed = before - self.buttons.len();
        if removed > 0 {
            tracing::debug!(node = %self.node, removed, "Purged stale tab buttons");
        }
    }

    /// Append an existing node as an uninitialized button. The declared
    /// count follows the list without reconciling.
    pub fn adopt(&mut self, scene: &Scene, node: NodeId) -> Result<usize> {
        if self.index_of(node).is_some() {
            return Err(TabError::AlreadyInGroup(node));
        }

        let button = TabButton::from_node(scene, node)?;
        self.buttons.push(button);
        self.declared_count = self.buttons.len();
        Ok(self.buttons.len() - 1)
    }

    /// Destroy the widget together with every button it owns.
    pub fn destroy(mut self, scene: &mut Scene) {
        while let Some(button) = self.buttons.pop() {
            scene.destroy(button.node());
        }
        if let Some(first) = self.dormant.take() {
            scene.destroy(first.node());
        }
        scene.destroy(self.node);

        tracing::info!(node = %self.node, "Destroyed tab group");
    }

    // === Lookup ===

    pub fn buttons(&self) -> &[TabButton] {
        &self.buttons
    }

    pub fn button(&self, index: usize) -> Option<&TabButton> {
        self.buttons.get(index)
    }

    pub fn button_mut(&mut self, index: usize) -> Option<&mut TabButton> {
        self.buttons.get_mut(index)
    }

    /// Position of a button in the list, looked up by identity.
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.buttons.iter().position(|b| b.node() == node)
    }

    // === Reference & selection ===

    /// Template used when cloning new buttons, clamped to the live list.
    pub fn reference_index(&self) -> usize {
        clamp_index(self.reference_index as i64, self.buttons.len())
    }

    pub fn set_reference_index(&mut self, index: i64) {
        self.reference_index = clamp_index(index, self.buttons.len());
    }

    /// Selected index, clamped to the live list.
    pub fn selected_index(&self) -> usize {
        clamp_index(self.selected_index as i64, self.buttons.len())
    }

    pub fn selected_button(&self) -> Option<&TabButton> {
        self.buttons.get(self.selected_index())
    }

    pub(crate) fn selected_node(&self) -> Option<NodeId> {
        self.selected_button().map(|b| b.node())
    }

    /// Make `node` the selection. Returns false if it is not in the list.
    pub fn set_selected_button(&mut self, node: NodeId) -> bool {
        match self.index_of(node) {
            Some(index) => {
                self.selected_index = index;
                true
            }
            None => false,
        }
    }

    /// Select a button by (clamped) index, fire the click event unless
    /// `silent` and refresh every button.
    pub fn select_index(&mut self, scene: &mut Scene, index: i64, silent: bool) -> Result<()> {
        let resolved = clamp_index(index, self.buttons.len());
        let live = self
            .buttons
            .get(resolved)
            .is_some_and(|b| scene.contains(b.node()));
        if !live {
            tracing::error!(
                node = %self.node,
                index = resolved,
                "The tab button to select is missing"
            );
            return Err(TabError::InvalidSelection { index: resolved });
        }

        self.selected_index = resolved;
        self.buttons[resolved].apply_appearance(scene, &self.transition, ButtonState::Click);

        if !silent {
            self.events.emit_clicked(resolved);
        }

        self.refresh_appearances(scene);
        Ok(())
    }

    pub(crate) fn notify_clicked(&self, index: usize) {
        self.events.emit_clicked(index);
    }

    // === Appearance ===

    /// Tell every live button which state to assume.
    pub fn refresh_appearances(&mut self, scene: &mut Scene) {
        let selected = self.selected_node();
        let interactable = self.is_interactable();

        for button in self.buttons.iter_mut() {
            if !scene.contains(button.node()) {
                continue;
            }

            let state = if !interactable {
                ButtonState::Disable
            } else if Some(button.node()) == selected {
                ButtonState::Click
            } else {
                ButtonState::Reset
            };
            button.apply_appearance(scene, &self.transition, state);
        }
    }

    /// First activation: capture every baseline and show the current selection.
    pub fn start(&mut self, scene: &mut Scene) {
        for button in self.buttons.iter_mut() {
            button.capture_baseline(scene);
        }
        self.refresh_appearances(scene);
    }

    /// Advance in-flight tweens by one frame. Returns how many are still running.
    pub fn tick(&mut self, scene: &mut Scene, dt: f32) -> usize {
        let mut running = 0;
        for button in self.buttons.iter_mut() {
            if button.advance_tween(scene, dt) {
                running += 1;
            }
        }
        running
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn set_transition(&mut self, scene: &mut Scene, transition: Transition) {
        self.transition = transition;
        self.refresh_appearances(scene);
    }

    // === Interactability ===

    /// Own flag ANDed with what ancestor interaction groups allow.
    pub fn is_interactable(&self) -> bool {
        self.interactable && self.groups_allow_interaction
    }

    /// The group's own flag, ignoring ancestors.
    pub fn interactable_flag(&self) -> bool {
        self.interactable
    }

    pub fn set_interactable(&mut self, scene: &mut Scene, interactable: bool) {
        self.interactable = interactable;
        self.refresh_appearances(scene);
    }

    // === Events ===

    pub fn on_tab_created(&mut self, listener: impl Fn(usize, &TabButton) + Send + Sync + 'static) {
        self.events.on_created(listener);
    }

    pub fn on_tab_clicked(&mut self, listener: impl Fn(usize) + Send + Sync + 'static) {
        self.events.on_clicked(listener);
    }

    pub fn events_mut(&mut self) -> &mut TabEvents {
        &mut self.events
    }
}

/// Clamp to `[0, len - 1]`; an empty list resolves to 0.
fn clamp_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.clamp(0, len as i64 - 1) as usize
}

/// `"Tab_3"` for index 3, replacing any previous `_suffix`.
fn indexed_name(name: &str, index: usize) -> String {
    let base = name.rsplit_once('_').map_or(name, |(base, _)| base);
    format!("{}_{}", base, index)
}
