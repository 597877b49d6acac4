//! Drag-and-drop editing of a layout.

use crate::layout::{DashboardLayout, DropTarget};
use pmdesk_core::StoreResult;
use tracing::debug;

/// The widget currently being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggedItem {
    /// Widget id.
    pub id: String,
    /// Widget type.
    pub kind: String,
}

/// Drag state over a [`DashboardLayout`].
///
/// Dragging is only possible in drag mode. Leaving or entering drag mode
/// drops whatever was being dragged.
#[derive(Debug)]
pub struct LayoutEditor {
    layout: DashboardLayout,
    drag_mode: bool,
    dragged: Option<DraggedItem>,
}

impl LayoutEditor {
    /// Start editing `layout`, outside drag mode.
    pub fn new(layout: DashboardLayout) -> Self {
        Self {
            layout,
            drag_mode: false,
            dragged: None,
        }
    }

    /// The edited layout.
    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    /// Mutable access for add/remove/update/reset.
    pub fn layout_mut(&mut self) -> &mut DashboardLayout {
        &mut self.layout
    }

    /// Give the layout back.
    pub fn into_layout(self) -> DashboardLayout {
        self.layout
    }

    /// Whether drag mode is on.
    pub fn is_drag_mode(&self) -> bool {
        self.drag_mode
    }

    /// The widget being dragged, if any.
    pub fn dragged(&self) -> Option<&DraggedItem> {
        self.dragged.as_ref()
    }

    /// Flip drag mode and return the new state.
    pub fn toggle_drag_mode(&mut self) -> bool {
        self.drag_mode = !self.drag_mode;
        self.dragged = None;
        debug!(page = %self.layout.page(), drag_mode = self.drag_mode, "Drag mode toggled");
        self.drag_mode
    }

    /// Pick up a widget. Ignored outside drag mode.
    pub fn start_drag(&mut self, id: impl Into<String>, kind: impl Into<String>) -> bool {
        if !self.drag_mode {
            return false;
        }
        self.dragged = Some(DraggedItem {
            id: id.into(),
            kind: kind.into(),
        });
        true
    }

    /// Let go of the dragged widget without moving it.
    pub fn cancel_drag(&mut self) {
        self.dragged = None;
    }

    /// Drop the dragged widget on `target` and save the layout.
    ///
    /// Returns whether anything moved.
    pub async fn drop_on(&mut self, target: impl Into<DropTarget>) -> StoreResult<bool> {
        if !self.drag_mode {
            return Ok(false);
        }
        let Some(dragged) = self.dragged.take() else {
            return Ok(false);
        };

        let target = target.into();
        debug!(page = %self.layout.page(), id = %dragged.id, target = %target, "Dropping widget");
        self.layout
            .move_item(&dragged.id, &dragged.kind, &target)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{storage_key, LayoutItem};
    use pmdesk_core::{KeyValueStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    async fn editor(store: Arc<MemoryStore>) -> LayoutEditor {
        let layout = DashboardLayout::load(
            store,
            "user",
            vec![
                LayoutItem::new("projects", "cards"),
                LayoutItem::new("calendar", "calendar"),
                LayoutItem::new("files", "files"),
            ],
        )
        .await
        .unwrap();
        LayoutEditor::new(layout)
    }

    fn ids(editor: &LayoutEditor) -> Vec<String> {
        editor.layout().items().iter().map(|i| i.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_drag_ignored_outside_drag_mode() {
        let mut editor = editor(Arc::new(MemoryStore::new())).await;
        assert!(!editor.start_drag("projects", "cards"));
        assert!(editor.dragged().is_none());
        assert!(!editor.drop_on("end").await.unwrap());
    }

    #[tokio::test]
    async fn test_drag_and_drop_saves() {
        let store = Arc::new(MemoryStore::new());
        let mut editor = editor(store.clone()).await;

        assert!(editor.toggle_drag_mode());
        assert!(editor.start_drag("files", "files"));
        assert!(editor.drop_on("projects").await.unwrap());
        assert_eq!(ids(&editor), vec!["files", "projects", "calendar"]);
        assert!(editor.dragged().is_none());

        let saved = store.get(&storage_key("user")).await.unwrap().unwrap();
        let saved: Vec<LayoutItem> = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved[0].id, "files");
    }

    #[tokio::test]
    async fn test_drop_without_drag_is_noop() {
        let mut editor = editor(Arc::new(MemoryStore::new())).await;
        editor.toggle_drag_mode();
        assert!(!editor.drop_on("end").await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_and_toggle_clear_drag() {
        let mut editor = editor(Arc::new(MemoryStore::new())).await;
        editor.toggle_drag_mode();

        editor.start_drag("projects", "cards");
        editor.cancel_drag();
        assert!(editor.dragged().is_none());

        editor.start_drag("projects", "cards");
        assert!(!editor.toggle_drag_mode());
        assert!(editor.dragged().is_none());
        assert_eq!(ids(&editor), vec!["projects", "calendar", "files"]);
    }
}
