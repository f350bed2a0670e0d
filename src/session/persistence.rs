// ABOUTME: Session snapshot persistence across application restarts
// Writes the open panels and the active selection into the durable key-value store

use crate::models::{ConnectionId, PanelId};
use crate::store::{KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const CURRENT_PANEL_KEY: &str = "currentPanel";
pub const OPEN_PANELS_KEY: &str = "openPanels";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPanel {
    pub id: PanelId,
    pub file: String,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

/// A panel as remembered between runs. Content is reloaded from the file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPanel {
    pub id: PanelId,
    pub name: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<ConnectionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub current_panel: Option<CurrentPanel>,
    pub open_panels: Vec<PersistedPanel>,
}

pub struct SessionPersistence {
    store: Arc<dyn KeyValueStore>,
}

impl SessionPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Save a snapshot, replacing whatever the previous run left behind
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        match &snapshot.current_panel {
            Some(current) => self
                .store
                .set(CURRENT_PANEL_KEY, serde_json::to_value(current)?)?,
            None => self.store.remove(CURRENT_PANEL_KEY)?,
        }
        self.store
            .set(OPEN_PANELS_KEY, serde_json::to_value(&snapshot.open_panels)?)?;

        debug!("Persisted {} open panels", snapshot.open_panels.len());
        Ok(())
    }

    /// Load the last snapshot. Malformed values are skipped, not fatal.
    pub fn load(&self) -> Result<SessionSnapshot, StoreError> {
        let current_panel = match self.store.get(CURRENT_PANEL_KEY)? {
            Some(value) => match serde_json::from_value::<CurrentPanel>(value) {
                Ok(current) => Some(current),
                Err(e) => {
                    warn!("Ignoring malformed {} entry: {}", CURRENT_PANEL_KEY, e);
                    None
                }
            },
            None => None,
        };

        let open_panels = match self.store.get(OPEN_PANELS_KEY)? {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(|entry| match serde_json::from_value::<PersistedPanel>(entry) {
                    Ok(panel) => Some(panel),
                    Err(e) => {
                        warn!("Skipping malformed persisted panel: {}", e);
                        None
                    }
                })
                .collect(),
            Some(other) => {
                warn!("Ignoring {} entry that is not a list: {}", OPEN_PANELS_KEY, other);
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(SessionSnapshot {
            current_panel,
            open_panels,
        })
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(CURRENT_PANEL_KEY)?;
        self.store.remove(OPEN_PANELS_KEY)
    }
}
