//! Persisted widget layouts.
//!
//! A layout is an ordered list of [`LayoutItem`]s saved as one JSON array
//! under `dashboard_<page>_layout`. An item is identified by its id and type
//! together; anything else it carries is free-form widget data.

use pmdesk_core::{KeyValueStore, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keys owned by [`LayoutItem`] itself, never stored as widget data.
const RESERVED_KEYS: [&str; 3] = ["id", "type", "order"];

/// Storage key of a page's layout.
pub fn storage_key(page: &str) -> String {
    format!("dashboard_{}_layout", page)
}

/// One widget on a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Widget id, unique within its type.
    pub id: String,
    /// Widget type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Position in the layout.
    #[serde(default)]
    pub order: usize,
    /// Everything else the widget carries.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl LayoutItem {
    /// Create an item with no data.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            order: 0,
            data: Map::new(),
        }
    }

    /// Attach a data field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.data.insert(key, value.into());
        }
        self
    }

    /// Whether this is the item with the given id and type.
    pub fn is(&self, id: &str, kind: &str) -> bool {
        self.id == id && self.kind == kind
    }

    /// Whether a drop on `target` lands on this item.
    fn is_drop_zone(&self, target: &str) -> bool {
        self.id == target || self.data.get("dropZoneId").and_then(Value::as_str) == Some(target)
    }

    fn merge(&mut self, data: Map<String, Value>) {
        for (key, value) in data {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                self.data.insert(key, value);
            }
        }
    }
}

/// Where a dragged item is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// After every other item.
    End,
    /// Before the item with this id or drop zone id.
    Before(String),
}

impl From<&str> for DropTarget {
    fn from(target: &str) -> Self {
        match target {
            "end" => DropTarget::End,
            other => DropTarget::Before(other.to_string()),
        }
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::End => f.write_str("end"),
            DropTarget::Before(id) => f.write_str(id),
        }
    }
}

/// The layout of one dashboard page, saved on every change.
pub struct DashboardLayout {
    page: String,
    defaults: Vec<LayoutItem>,
    items: Vec<LayoutItem>,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for DashboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardLayout")
            .field("page", &self.page)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl DashboardLayout {
    /// Load the saved layout of `page`, or `defaults` when nothing usable is
    /// saved.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        page: impl Into<String>,
        defaults: Vec<LayoutItem>,
    ) -> StoreResult<Self> {
        let page = page.into();
        let items = match store.get(&storage_key(&page)).await? {
            Some(raw) => match serde_json::from_str::<Vec<LayoutItem>>(&raw) {
                Ok(items) => items,
                Err(err) => {
                    warn!(page = %page, error = %err, "Failed to load saved layout");
                    defaults.clone()
                }
            },
            None => defaults.clone(),
        };

        Ok(Self {
            page,
            defaults,
            items,
            store,
        })
    }

    /// Page name.
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Storage key of this layout.
    pub fn key(&self) -> String {
        storage_key(&self.page)
    }

    /// Items in display order.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Layout used when nothing is saved.
    pub fn defaults(&self) -> &[LayoutItem] {
        &self.defaults
    }

    /// Look up an item.
    pub fn find(&self, id: &str, kind: &str) -> Option<&LayoutItem> {
        self.items.iter().find(|item| item.is(id, kind))
    }

    /// Write the current layout to the store.
    pub async fn save(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.items)?;
        self.store.set(&self.key(), &raw).await?;
        debug!(page = %self.page, items = self.items.len(), "Layout saved");
        Ok(())
    }

    /// Append a widget.
    pub async fn add(
        &mut self,
        id: impl Into<String>,
        kind: impl Into<String>,
        data: Map<String, Value>,
    ) -> StoreResult<()> {
        let mut item = LayoutItem::new(id, kind);
        item.merge(data);
        item.order = self.items.len();
        self.items.push(item);
        self.save().await
    }

    /// Remove a widget. Returns whether it was present.
    pub async fn remove(&mut self, id: &str, kind: &str) -> StoreResult<bool> {
        let before = self.items.len();
        self.items.retain(|item| !item.is(id, kind));
        if self.items.len() == before {
            return Ok(false);
        }
        self.renumber();
        self.save().await?;
        Ok(true)
    }

    /// Merge `data` into a widget's data. Returns whether it was present.
    pub async fn update(
        &mut self,
        id: &str,
        kind: &str,
        data: Map<String, Value>,
    ) -> StoreResult<bool> {
        match self.items.iter_mut().find(|item| item.is(id, kind)) {
            Some(item) => item.merge(data),
            None => return Ok(false),
        }
        self.save().await?;
        Ok(true)
    }

    /// Move a widget to `target`. Returns whether it was present.
    ///
    /// A target that matches no remaining item moves the widget to the end.
    pub async fn move_item(
        &mut self,
        id: &str,
        kind: &str,
        target: &DropTarget,
    ) -> StoreResult<bool> {
        let Some(from) = self.items.iter().position(|item| item.is(id, kind)) else {
            return Ok(false);
        };
        let dragged = self.items.remove(from);

        let to = match target {
            DropTarget::End => None,
            DropTarget::Before(zone) => self.items.iter().position(|item| item.is_drop_zone(zone)),
        };
        match to {
            Some(index) => self.items.insert(index, dragged),
            None => self.items.push(dragged),
        }

        self.renumber();
        self.save().await?;
        Ok(true)
    }

    /// Go back to the defaults and forget the saved layout.
    pub async fn reset(&mut self) -> StoreResult<()> {
        self.items = self.defaults.clone();
        self.store.remove(&self.key()).await?;
        debug!(page = %self.page, "Layout reset");
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order = index;
        }
    }
}
