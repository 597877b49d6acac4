//! Which dashboard each role gets.

use crate::layout::{DashboardLayout, LayoutItem};
use pmdesk_core::{KeyValueStore, ReferenceKind, Role, StoreResult};
use serde_json::Value;
use std::sync::Arc;

/// The dashboard page shown to one role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDashboard {
    /// Role the page is for.
    pub role: Role,
    /// Page name, also the layout storage namespace.
    pub page: &'static str,
    /// Page heading.
    pub title: &'static str,
    /// Layout used until the user rearranges it.
    pub widgets: Vec<LayoutItem>,
}

impl RoleDashboard {
    /// The dashboard for `role`. Unknown roles get the regular user's page.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Administrator => Self::new(role, "admin", "Administration", admin_widgets()),
            Role::Moderator => Self::new(role, "moderator", "Moderation", moderator_widgets()),
            Role::User | Role::Unknown(_) => Self::new(role, "user", "My projects", user_widgets()),
        }
    }

    fn new(role: Role, page: &'static str, title: &'static str, widgets: Vec<LayoutItem>) -> Self {
        let widgets = widgets
            .into_iter()
            .enumerate()
            .map(|(order, item)| LayoutItem { order, ..item })
            .collect();
        Self {
            role,
            page,
            title,
            widgets,
        }
    }

    /// Load this page's saved layout, or its defaults.
    pub async fn open(&self, store: Arc<dyn KeyValueStore>) -> StoreResult<DashboardLayout> {
        DashboardLayout::load(store, self.page, self.widgets.clone()).await
    }
}

fn projects() -> LayoutItem {
    LayoutItem::new("projects", "cards").with("title", "Projects")
}

fn calendar() -> LayoutItem {
    LayoutItem::new("calendar", "calendar").with("title", "Calendar")
}

fn filter() -> LayoutItem {
    LayoutItem::new("filter", "filter").with("dropZoneId", "sidebar")
}

fn files(bucket: &str, title: &str) -> LayoutItem {
    LayoutItem::new(format!("{}-files", bucket), "files")
        .with("bucket", bucket)
        .with("title", title)
}

fn user_widgets() -> Vec<LayoutItem> {
    vec![projects(), filter(), calendar(), files("public", "Files")]
}

fn moderator_widgets() -> Vec<LayoutItem> {
    vec![
        projects(),
        filter(),
        calendar(),
        files("public", "Files"),
        files("private", "Private files"),
    ]
}

fn admin_widgets() -> Vec<LayoutItem> {
    let tables: Vec<Value> = ReferenceKind::ALL
        .iter()
        .map(|kind| Value::from(kind.collection_segment()))
        .collect();

    vec![
        projects(),
        calendar(),
        files("private", "Private files"),
        files("public", "Files"),
        LayoutItem::new("references", "references")
            .with("title", "Reference data")
            .with("tables", tables),
        LayoutItem::new("templates", "templates").with("title", "Templates"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DropTarget;
    use pmdesk_core::MemoryStore;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Role::User, "user")]
    #[case(Role::Moderator, "moderator")]
    #[case(Role::Administrator, "admin")]
    #[case(Role::Unknown(7), "user")]
    fn test_page_per_role(#[case] role: Role, #[case] page: &str) {
        assert_eq!(RoleDashboard::for_role(role).page, page);
    }

    #[test]
    fn test_private_files_need_elevated_role() {
        let has_private = |role| {
            RoleDashboard::for_role(role)
                .widgets
                .iter()
                .any(|w| w.id == "private-files")
        };
        assert!(!has_private(Role::User));
        assert!(has_private(Role::Moderator));
        assert!(has_private(Role::Administrator));
    }

    #[test]
    fn test_widgets_are_ordered() {
        let dashboard = RoleDashboard::for_role(Role::Administrator);
        for (index, widget) in dashboard.widgets.iter().enumerate() {
            assert_eq!(widget.order, index);
        }
        let references = dashboard.widgets.iter().find(|w| w.kind == "references").unwrap();
        assert_eq!(
            references.data["tables"].as_array().map(Vec::len),
            Some(ReferenceKind::ALL.len())
        );
    }

    #[tokio::test]
    async fn test_layouts_are_kept_per_page() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let admin = RoleDashboard::for_role(Role::Administrator);
        let mut layout = admin.open(store.clone()).await.unwrap();
        layout
            .move_item("templates", "templates", &DropTarget::Before("projects".into()))
            .await
            .unwrap();

        let reopened = admin.open(store.clone()).await.unwrap();
        assert_eq!(reopened.items()[0].id, "templates");

        let user = RoleDashboard::for_role(Role::User).open(store).await.unwrap();
        assert_eq!(user.items()[0].id, "projects");
    }
}
