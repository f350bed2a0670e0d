// ABOUTME: Panel data model representing one open editing surface
// A panel is either the home view or a search file optionally bound to a connection

use super::connection::{Connection, ConnectionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const HOME_PANEL_ID: PanelId = PanelId(0);
pub const HOME_PANEL_NAME: &str = "home";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub u64);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub id: PanelId,
    pub name: String,
    pub connection: Option<Arc<Connection>>,
    /// Key into the file store. Empty for the home panel.
    pub file: String,
    /// Unsaved editor buffer, authoritative until flushed to the file store.
    pub content: Option<String>,
}

impl Panel {
    pub fn home() -> Self {
        Self {
            id: HOME_PANEL_ID,
            name: HOME_PANEL_NAME.to_string(),
            connection: None,
            file: String::new(),
            content: None,
        }
    }

    pub fn from_file(id: PanelId, file: String, content: String) -> Self {
        Self {
            id,
            name: file.clone(),
            connection: None,
            file,
            content: Some(content),
        }
    }

    pub fn for_connection(id: PanelId, connection: Arc<Connection>, file: String, content: String) -> Self {
        Self {
            id,
            name: file.clone(),
            connection: Some(connection),
            file,
            content: Some(content),
        }
    }

    pub fn is_home(&self) -> bool {
        self.id == HOME_PANEL_ID
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection.as_ref().map(|connection| connection.id)
    }

    /// Short label for listings, e.g. `Acme.search [Acme]`.
    pub fn label(&self) -> String {
        match &self.connection {
            Some(connection) => format!("{} [{}]", self.name, connection.name),
            None => self.name.clone(),
        }
    }
}
