//! # pmdesk-dashboard
//!
//! Role-based dashboards with user-arrangeable widgets.
//!
//! Each [`Role`](pmdesk_core::Role) gets a [`RoleDashboard`] with a default
//! widget layout. Users rearrange widgets through a [`LayoutEditor`]; every
//! change is saved to the injected [`KeyValueStore`](pmdesk_core::KeyValueStore)
//! and restored on the next [`DashboardLayout::load`].
//!
//! ## Example
//!
//! ```rust
//! use pmdesk_core::{KeyValueStore, MemoryStore, Role};
//! use pmdesk_dashboard::{LayoutEditor, RoleDashboard};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
//! let layout = RoleDashboard::for_role(Role::Moderator).open(store).await.unwrap();
//!
//! let mut editor = LayoutEditor::new(layout);
//! editor.toggle_drag_mode();
//! editor.start_drag("calendar", "calendar");
//! editor.drop_on("projects").await.unwrap();
//! assert_eq!(editor.layout().items()[0].id, "calendar");
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod editor;
pub mod layout;
pub mod role;

pub use editor::{DraggedItem, LayoutEditor};
pub use layout::{storage_key, DashboardLayout, DropTarget, LayoutItem};
pub use role::RoleDashboard;
