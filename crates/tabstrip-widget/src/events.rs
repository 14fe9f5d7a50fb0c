//! Outward notifications of a tab group

use std::sync::Arc;

use crate::button::TabButton;

/// Called with the index and the freshly created (or reactivated) button.
pub type TabCreatedListener = Arc<dyn Fn(usize, &TabButton) + Send + Sync>;
/// Called with the index of the clicked button.
pub type TabClickedListener = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Clone, Default)]
pub struct TabEvents {
    created: Vec<TabCreatedListener>,
    clicked: Vec<TabClickedListener>,
}

impl TabEvents {
    pub fn on_created(&mut self, listener: impl Fn(usize, &TabButton) + Send + Sync + 'static) {
        self.created.push(Arc::new(listener));
    }

    pub fn on_clicked(&mut self, listener: impl Fn(usize) + Send + Sync + 'static) {
        self.clicked.push(Arc::new(listener));
    }

    pub fn emit_created(&self, index: usize, button: &TabButton) {
        tracing::debug!(index, node = %button.node(), "Tab button created");
        for listener in &self.created {
            listener(index, button);
        }
    }

    pub fn emit_clicked(&self, index: usize) {
        tracing::debug!(index, "Tab button clicked");
        for listener in &self.clicked {
            listener(index);
        }
    }
}

impl std::fmt::Debug for TabEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabEvents")
            .field("created", &self.created.len())
            .field("clicked", &self.clicked.len())
            .finish()
    }
}
