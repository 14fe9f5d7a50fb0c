//! Inspector: command application with undo grouping, and the panel read model

use chrono::{DateTime, Utc};

use tabstrip_scene::{NodeId, Scene, Subtree};
use tabstrip_widget::{AncestorInteractionAware, FadeMode, TabGroup, Transition};

use crate::command::InspectorCommand;
use crate::Result;

pub const DISABLED_WARNING: &str =
    "Tab group is disabled. To enable it again set the tab count to 1 or more.";

const DEFAULT_HISTORY_LIMIT: usize = 100;

/// The group plus the nodes under its own root. Other groups sharing the
/// scene are never part of a snapshot.
#[derive(Debug, Clone)]
struct Snapshot {
    subtree: Subtree,
    group: TabGroup,
}

impl Snapshot {
    fn take(scene: &Scene, group: &TabGroup) -> Result<Self> {
        Ok(Self {
            subtree: scene.capture(group.node())?,
            group: group.clone(),
        })
    }

    /// Put the captured state back. Listeners registered on the live group
    /// survive the restore.
    fn restore(&self, scene: &mut Scene, group: &mut TabGroup) -> Result<()> {
        scene.restore(&self.subtree)?;

        let events = std::mem::take(group.events_mut());
        *group = self.group.clone();
        *group.events_mut() = events;
        // Ancestors may have changed since the capture
        group.on_ancestor_groups_changed(scene);
        Ok(())
    }
}

/// One recorded user action.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub label: String,
    pub group: NodeId,
    pub recorded_at: DateTime<Utc>,
    before: Snapshot,
    after: Snapshot,
}

/// Applies inspector commands, one undo group per command.
#[derive(Debug)]
pub struct Inspector {
    undo: Vec<UndoEntry>,
    redo: Vec<UndoEntry>,
    limit: usize,
}

impl Inspector {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Apply `command`. Returns whether anything changed; unchanged state
    /// records no undo entry. A failing command leaves scene and group as
    /// they were.
    pub fn apply(
        &mut self,
        scene: &mut Scene,
        group: &mut TabGroup,
        command: &InspectorCommand,
    ) -> Result<bool> {
        let before = Snapshot::take(scene, group)?;
        let fingerprint = Fingerprint::of(group);

        if let Err(e) = execute(scene, group, command) {
            if let Err(restore_err) = before.restore(scene, group) {
                tracing::warn!(error = %restore_err, "Could not roll back failed command");
            }
            return Err(e);
        }

        if Fingerprint::of(group) == fingerprint {
            tracing::debug!(command = command.label(), "Inspector command changed nothing");
            return Ok(false);
        }

        self.undo.push(UndoEntry {
            label: command.label().to_string(),
            group: group.node(),
            recorded_at: Utc::now(),
            before,
            after: Snapshot::take(scene, group)?,
        });
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
        self.redo.clear();

        tracing::debug!(
            command = command.label(),
            node = %group.node(),
            generative = command.is_generative(),
            "Recorded undo group"
        );
        Ok(true)
    }

    /// Revert the latest entry if it belongs to `group`. Returns its label,
    /// or `None` when there is nothing to undo for this group. A failed
    /// restore keeps the entry on the undo stack.
    pub fn undo(&mut self, scene: &mut Scene, group: &mut TabGroup) -> Result<Option<String>> {
        match self.undo.pop() {
            Some(entry) if entry.group == group.node() => {
                if let Err(e) = entry.before.restore(scene, group) {
                    self.undo.push(entry);
                    return Err(e);
                }
                tracing::debug!(label = %entry.label, "Undo");
                let label = entry.label.clone();
                self.redo.push(entry);
                Ok(Some(label))
            }
            Some(entry) => {
                self.undo.push(entry);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Re-apply the latest undone entry if it belongs to `group`.
    pub fn redo(&mut self, scene: &mut Scene, group: &mut TabGroup) -> Result<Option<String>> {
        match self.redo.pop() {
            Some(entry) if entry.group == group.node() => {
                if let Err(e) = entry.after.restore(scene, group) {
                    self.redo.push(entry);
                    return Err(e);
                }
                tracing::debug!(label = %entry.label, "Redo");
                let label = entry.label.clone();
                self.undo.push(entry);
                Ok(Some(label))
            }
            Some(entry) => {
                self.redo.push(entry);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn history(&self) -> &[UndoEntry] {
        &self.undo
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Drop every entry recorded for `group`.
    pub fn forget(&mut self, group: NodeId) {
        self.undo.retain(|e| e.group != group);
        self.redo.retain(|e| e.group != group);
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

fn execute(scene: &mut Scene, group: &mut TabGroup, command: &InspectorCommand) -> Result<()> {
    match command {
        InspectorCommand::SetTabCount(count) => group.set_declared_count(scene, *count)?,
        InspectorCommand::IncrementTabCount => {
            let count = group.declared_count() as i64 + 1;
            group.set_declared_count(scene, count)?;
        }
        InspectorCommand::DecrementTabCount => {
            let count = group.declared_count() as i64 - 1;
            group.set_declared_count(scene, count)?;
        }
        InspectorCommand::SetReferenceIndex(index) => group.set_reference_index(*index),
        InspectorCommand::SetSelectedIndex(index) => group.select_index(scene, *index, false)?,
        InspectorCommand::SetInteractable(interactable) => {
            if group.interactable_flag() != *interactable {
                group.set_interactable(scene, *interactable);
            }
        }
        InspectorCommand::SetFadeMode(mode) => {
            if group.transition().mode() != *mode {
                group.set_transition(scene, Transition::for_mode(*mode));
            }
        }
        InspectorCommand::ClearTabs {
            reset_count,
            clear_all,
        } => group.clear_tabs(scene, *reset_count, *clear_all)?,
        InspectorCommand::GenerateTabs => group.generate_tabs(scene)?,
        InspectorCommand::ResetTabs => group.reset_tabs(scene)?,
    }
    Ok(())
}

/// Observable inspector state used to detect no-op commands.
#[derive(Debug, PartialEq)]
struct Fingerprint {
    declared_count: usize,
    reference_index: usize,
    selected_index: usize,
    interactable: bool,
    mode: FadeMode,
    buttons: Vec<NodeId>,
}

impl Fingerprint {
    fn of(group: &TabGroup) -> Self {
        Self {
            declared_count: group.declared_count(),
            reference_index: group.reference_index(),
            selected_index: group.selected_index(),
            interactable: group.interactable_flag(),
            mode: group.transition().mode(),
            buttons: group.buttons().iter().map(|b| b.node()).collect(),
        }
    }
}

/// What the inspector panel shows for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorView {
    pub tab_count: usize,
    pub reference_index: usize,
    pub selected_index: usize,
    pub interactable: bool,
    pub fade_mode: FadeMode,
    /// Fade parameters shown for the current mode.
    pub fade_fields: &'static [&'static str],
    pub warning: Option<&'static str>,
    pub buttons: Vec<String>,
}

impl InspectorView {
    pub fn of(scene: &Scene, group: &TabGroup) -> Self {
        let fade_mode = group.transition().mode();
        Self {
            tab_count: group.declared_count(),
            reference_index: group.reference_index(),
            selected_index: group.selected_index(),
            interactable: group.interactable_flag(),
            fade_mode,
            fade_fields: Self::fields_for(fade_mode),
            warning: group.is_disabled().then_some(DISABLED_WARNING),
            buttons: group
                .buttons()
                .iter()
                .map(|b| match scene.node(b.node()) {
                    Ok(node) => node.name.clone(),
                    Err(_) => "<missing>".to_string(),
                })
                .collect(),
        }
    }

    pub fn fields_for(mode: FadeMode) -> &'static [&'static str] {
        match mode {
            FadeMode::None => &[],
            FadeMode::ColorFade => &[
                "duration",
                "default",
                "hover",
                "selected",
                "disabled",
                "subtract_from_current",
            ],
            FadeMode::SpriteSwap => &["default", "hover", "selected", "disabled"],
            FadeMode::CustomCallback => &["reset", "hover", "click", "disable"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{create_tab_group, GroupTemplate};

    fn setup() -> (Scene, TabGroup, Inspector) {
        let mut scene = Scene::new();
        let created = create_tab_group(&mut scene, None, &GroupTemplate::default()).unwrap();
        (scene, created.group, Inspector::new())
    }

    fn apply(inspector: &mut Inspector, scene: &mut Scene, group: &mut TabGroup, line: &str) -> bool {
        let command = InspectorCommand::parse(line).unwrap();
        inspector.apply(scene, group, &command).unwrap()
    }

    #[test]
    fn test_count_command_is_one_undo_step() {
        let (mut scene, mut group, mut inspector) = setup();
        let nodes_before = scene.len();

        assert!(apply(&mut inspector, &mut scene, &mut group, "count 4"));
        assert_eq!(group.len(), 4);
        assert_eq!(inspector.history().len(), 1);
        assert_eq!(inspector.history()[0].label, "change variable on TabSystem");

        assert_eq!(
            inspector.undo(&mut scene, &mut group).unwrap().as_deref(),
            Some("change variable on TabSystem")
        );
        assert_eq!(group.len(), 1);
        assert_eq!(scene.len(), nodes_before);

        assert!(inspector.redo(&mut scene, &mut group).unwrap().is_some());
        assert_eq!(group.len(), 4);
        assert!(group.buttons().iter().all(|b| scene.contains(b.node())));
    }

    #[test]
    fn test_noop_command_records_nothing() {
        let (mut scene, mut group, mut inspector) = setup();

        assert!(!apply(&mut inspector, &mut scene, &mut group, "count 1"));
        assert!(!apply(&mut inspector, &mut scene, &mut group, "generate"));
        assert!(!apply(&mut inspector, &mut scene, &mut group, "interactable on"));
        assert!(!inspector.can_undo());
    }

    #[test]
    fn test_increment_and_decrement() {
        let (mut scene, mut group, mut inspector) = setup();

        apply(&mut inspector, &mut scene, &mut group, "count +");
        apply(&mut inspector, &mut scene, &mut group, "count +");
        assert_eq!(group.declared_count(), 3);
        apply(&mut inspector, &mut scene, &mut group, "count -");
        assert_eq!(group.declared_count(), 2);
        assert_eq!(inspector.history().len(), 3);
    }

    #[test]
    fn test_failed_command_restores_state() {
        let (mut scene, mut group, mut inspector) = setup();
        apply(&mut inspector, &mut scene, &mut group, "count 2");
        let doomed = group.button(1).unwrap().node();
        scene.destroy(doomed);

        let result = inspector.apply(&mut scene, &mut group, &InspectorCommand::SetSelectedIndex(1));
        assert!(result.is_err());
        assert_eq!(group.selected_index(), 0);
        assert_eq!(inspector.history().len(), 1);
    }

    #[test]
    fn test_new_command_clears_redo() {
        let (mut scene, mut group, mut inspector) = setup();
        apply(&mut inspector, &mut scene, &mut group, "count 2");
        inspector.undo(&mut scene, &mut group).unwrap();
        assert!(inspector.can_redo());

        apply(&mut inspector, &mut scene, &mut group, "count 3");
        assert!(!inspector.can_redo());
    }

    #[test]
    fn test_undo_skips_other_group() {
        let (mut scene, mut group, mut inspector) = setup();
        let mut other = create_tab_group(&mut scene, None, &GroupTemplate::default())
            .unwrap()
            .group;

        apply(&mut inspector, &mut scene, &mut group, "count 2");
        let extra = group.button(1).unwrap().node();
        other.set_declared_count(&mut scene, 3).unwrap();
        let other_nodes: Vec<NodeId> = other.buttons().iter().map(|b| b.node()).collect();

        assert!(inspector.undo(&mut scene, &mut other).unwrap().is_none());
        assert!(inspector.undo(&mut scene, &mut group).unwrap().is_some());

        assert!(!scene.contains(extra));
        assert_eq!(other.len(), 3);
        assert!(other_nodes.iter().all(|n| scene.contains(*n)));
        assert_eq!(scene.children(other.node()), other_nodes.as_slice());
    }

    #[test]
    fn test_undo_fails_when_group_was_reparented_away() {
        let (mut scene, mut group, mut inspector) = setup();
        apply(&mut inspector, &mut scene, &mut group, "count 2");

        let canvas = scene.parent(group.node()).unwrap();
        scene.set_parent(group.node(), None).unwrap();
        scene.destroy(canvas);

        assert!(inspector.undo(&mut scene, &mut group).is_err());
        assert!(inspector.can_undo());
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_listeners_survive_undo() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let (mut scene, mut group, mut inspector) = setup();
        apply(&mut inspector, &mut scene, &mut group, "count 2");

        let clicks = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&clicks);
        group.on_tab_clicked(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        inspector.undo(&mut scene, &mut group).unwrap();
        group.select_index(&mut scene, 0, false).unwrap();
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_history_limit() {
        let (mut scene, mut group, _) = setup();
        let mut inspector = Inspector::with_limit(2);
        for count in 2..=5 {
            inspector
                .apply(&mut scene, &mut group, &InspectorCommand::SetTabCount(count))
                .unwrap();
        }
        assert_eq!(inspector.history().len(), 2);
    }

    #[test]
    fn test_view_shows_mode_fields_and_warning() {
        let (mut scene, mut group, mut inspector) = setup();

        let view = InspectorView::of(&scene, &group);
        assert_eq!(view.tab_count, 1);
        assert_eq!(view.fade_mode, FadeMode::ColorFade);
        assert!(view.fade_fields.contains(&"subtract_from_current"));
        assert!(view.warning.is_none());
        assert_eq!(view.buttons, vec!["Tab_0".to_string()]);

        apply(&mut inspector, &mut scene, &mut group, "fade sprite");
        apply(&mut inspector, &mut scene, &mut group, "count 0");
        let view = InspectorView::of(&scene, &group);
        assert_eq!(view.fade_mode, FadeMode::SpriteSwap);
        assert_eq!(view.fade_fields.len(), 4);
        assert_eq!(view.warning, Some(DISABLED_WARNING));
        assert!(view.buttons.is_empty());
    }

    #[test]
    fn test_reset_and_clear_commands() {
        let (mut scene, mut group, mut inspector) = setup();
        apply(&mut inspector, &mut scene, &mut group, "count 3");
        let first = group.button(0).unwrap().node();

        assert!(apply(&mut inspector, &mut scene, &mut group, "clear"));
        assert_eq!(group.len(), 1);
        assert_eq!(group.button(0).unwrap().node(), first);

        assert!(apply(&mut inspector, &mut scene, &mut group, "reset"));
        assert_eq!(group.len(), 1);
        assert_ne!(group.button(0).unwrap().node(), first);
        assert_eq!(
            inspector.history().last().unwrap().label,
            "reset tabs on TabSystem"
        );
    }
}
