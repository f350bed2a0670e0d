// ABOUTME: Panel lifecycle management for the editor session
// Opens, focuses, saves and closes panels against an injected file store

use crate::config::SessionConfig;
use crate::models::{Connection, ConnectionId, Panel, PanelId, HOME_PANEL_ID};
use crate::registry::ConnectionRegistry;
use crate::session::error::SessionError;
use crate::session::persistence::{CurrentPanel, PersistedPanel, SessionSnapshot};
use crate::store::{FileStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// First id handed out after the home panel.
const FIRST_PANEL_ID: u64 = 2;

/// What `establish_panel` should open.
#[derive(Debug, Clone)]
pub enum PanelTarget {
    File(String),
    Connection(Arc<Connection>),
}

impl From<&str> for PanelTarget {
    fn from(path: &str) -> Self {
        Self::File(path.to_string())
    }
}

impl From<String> for PanelTarget {
    fn from(path: String) -> Self {
        Self::File(path)
    }
}

impl From<Arc<Connection>> for PanelTarget {
    fn from(connection: Arc<Connection>) -> Self {
        Self::Connection(connection)
    }
}

impl From<Connection> for PanelTarget {
    fn from(connection: Connection) -> Self {
        Self::Connection(Arc::new(connection))
    }
}

pub struct PanelSessionManager {
    panels: Vec<Panel>,
    active: PanelId,
    next_panel_id: u64,
    // Panels ever opened per connection; never decremented so suffixes are not reused
    connection_counts: HashMap<ConnectionId, usize>,
    file_store: Arc<dyn FileStore>,
    registry: Arc<dyn ConnectionRegistry>,
    config: SessionConfig,
}

impl PanelSessionManager {
    pub fn new(
        file_store: Arc<dyn FileStore>,
        registry: Arc<dyn ConnectionRegistry>,
        config: SessionConfig,
    ) -> Self {
        Self {
            panels: vec![Panel::home()],
            active: HOME_PANEL_ID,
            next_panel_id: FIRST_PANEL_ID,
            connection_counts: HashMap::new(),
            file_store,
            registry,
            config,
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, panel_id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.id == panel_id)
    }

    pub fn panel_position(&self, panel_id: PanelId) -> Option<usize> {
        self.panels.iter().position(|panel| panel.id == panel_id)
    }

    pub const fn active_panel_id(&self) -> PanelId {
        self.active
    }

    pub fn active_panel(&self) -> &Panel {
        // The home panel is never removed, so falling back to the head is always valid
        self.panel(self.active).unwrap_or(&self.panels[0])
    }

    /// Open a file or connection panel, or focus the panel already showing that file.
    /// Returns the id of the active panel afterwards.
    pub async fn establish_panel(
        &mut self,
        target: impl Into<PanelTarget>,
    ) -> Result<PanelId, SessionError> {
        match target.into() {
            PanelTarget::File(path) => self.establish_file_panel(path).await,
            PanelTarget::Connection(connection) => {
                self.establish_connection_panel(connection).await
            }
        }
    }

    async fn establish_file_panel(&mut self, path: String) -> Result<PanelId, SessionError> {
        if let Some(existing) = self.panels.iter().find(|panel| panel.file == path) {
            // In-memory content wins over disk, no reload
            debug!("File {} already open in panel {}", path, existing.id);
            self.active = existing.id;
            return Ok(existing.id);
        }

        let content = self.file_store.read_file(&path).await?;

        let panel = Panel::from_file(self.allocate_panel_id()?, path, content);
        info!("Opened panel {} for file {}", panel.id, panel.file);
        Ok(self.push_active(panel))
    }

    async fn establish_connection_panel(
        &mut self,
        connection: Arc<Connection>,
    ) -> Result<PanelId, SessionError> {
        let count = self
            .connection_counts
            .get(&connection.id)
            .copied()
            .unwrap_or(0);
        let candidate = self.candidate_file_name(&connection.name, count);
        let scratch_path = format!("{}/{}", self.config.scratch_dir, candidate);

        let (file, content) = if self.file_store.exists(&candidate).await? {
            let content = self.file_store.read_file(&candidate).await?;
            (candidate, content)
        } else if self.file_store.exists(&scratch_path).await? {
            let content = self.file_store.read_file(&scratch_path).await?;
            (scratch_path, content)
        } else {
            // Not written to disk until the first save
            (candidate, self.config.default_snippet.clone())
        };

        let id = self.allocate_panel_id()?;
        *self.connection_counts.entry(connection.id).or_insert(0) += 1;

        let panel = Panel::for_connection(id, connection, file, content);
        info!(
            "Opened panel {} for connection {} as {}",
            panel.id,
            panel.connection_id().map_or_else(String::new, |id| id.to_string()),
            panel.file
        );
        Ok(self.push_active(panel))
    }

    fn candidate_file_name(&self, connection_name: &str, count: usize) -> String {
        if count == 0 {
            format!("{}.{}", connection_name, self.config.extension)
        } else {
            format!("{}-{}.{}", connection_name, count, self.config.extension)
        }
    }

    fn allocate_panel_id(&mut self) -> Result<PanelId, SessionError> {
        let id = PanelId(self.next_panel_id);
        self.next_panel_id = self
            .next_panel_id
            .checked_add(1)
            .ok_or_else(|| SessionError::Internal("Panel ids exhausted".to_string()))?;
        Ok(id)
    }

    fn push_active(&mut self, panel: Panel) -> PanelId {
        let id = panel.id;
        self.panels.push(panel);
        self.active = id;
        id
    }

    /// Whether the panel's file (the active panel's when `panel` is `None`) exists.
    /// Store failures are returned as-is.
    pub async fn check_file_exists(&self, panel: Option<PanelId>) -> Result<bool, StoreError> {
        let Some(check_panel) = self.panel(panel.unwrap_or(self.active)) else {
            return Ok(false);
        };
        self.file_store.exists(&check_panel.file).await
    }

    /// Close a panel, optionally saving it first. A failed save leaves the panel open.
    pub async fn close_panel(
        &mut self,
        panel: Option<PanelId>,
        save_file: bool,
    ) -> Result<(), SessionError> {
        let Some(panel_id) = panel else {
            return Ok(());
        };
        if panel_id == HOME_PANEL_ID {
            debug!("Ignoring request to close the home panel");
            return Ok(());
        }
        let Some(closing) = self.panel(panel_id) else {
            debug!("Panel {} is not open, nothing to close", panel_id);
            return Ok(());
        };

        if save_file {
            let content = closing.content.clone().unwrap_or_default();
            let file = closing.file.clone();
            if let Err(e) = self.save_content(Some(panel_id), content, true).await {
                error!("Failed to save panel {} ({}) before closing: {:?}", panel_id, file, e);
                return Err(SessionError::Internal(e.to_string()));
            }
        }

        let Some(removed_index) = self.panel_position(panel_id) else {
            return Ok(());
        };
        self.panels.remove(removed_index);

        if self.active == panel_id {
            let next_index = removed_index.min(self.panels.len() - 1);
            self.active = self.panels[next_index].id;
        }

        info!("Closed panel {}, active panel is now {}", panel_id, self.active);
        Ok(())
    }

    /// Focus a panel by id. Unknown ids are ignored; returns whether focus moved.
    pub fn set_active_panel(&mut self, panel_id: PanelId) -> bool {
        if self.panel(panel_id).is_none() {
            return false;
        }
        self.active = panel_id;
        true
    }

    /// Store `content` in the panel buffer, then write it through when the file exists.
    ///
    /// With `validate_file_path`, a panel whose file is missing asks the store for
    /// a folder and moves its file under it. Writes only ever go to paths that
    /// already exist, so a never-saved panel stays in memory.
    pub async fn save_content(
        &mut self,
        panel: Option<PanelId>,
        content: impl Into<String>,
        validate_file_path: bool,
    ) -> Result<(), SessionError> {
        let target = panel.unwrap_or(self.active);
        let Some(index) = self.panel_position(target) else {
            return Ok(());
        };

        let content = content.into();
        self.panels[index].content = Some(content.clone());

        if self.panels[index].is_home() {
            return Ok(());
        }

        let mut file_path = self.panels[index].file.clone();

        if !self.file_store.exists(&file_path).await? && validate_file_path {
            let selected_folder = self
                .file_store
                .select_folder()
                .await?
                .filter(|folder| !folder.trim().is_empty())
                .ok_or_else(SessionError::folder_not_found)?;
            file_path = format!("{}/{}", selected_folder.trim_end_matches('/'), file_path);
            debug!("Panel {} file relocated to {}", target, file_path);
        }

        self.panels[index].file.clone_from(&file_path);

        if self.file_store.exists(&file_path).await? {
            self.file_store.save_file(&file_path, &content).await?;
            debug!("Saved panel {} to {}", target, file_path);
        } else {
            debug!("Panel {} kept in memory, {} does not exist yet", target, file_path);
        }

        Ok(())
    }

    pub fn load_default_snippet(&mut self) {
        let snippet = self.config.default_snippet.clone();
        let active = self.active;
        if let Some(panel) = self.panels.iter_mut().find(|panel| panel.id == active) {
            panel.content = Some(snippet);
        }
    }

    /// Serializable view of the open panels and the active selection.
    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.active_panel();
        SessionSnapshot {
            current_panel: Some(CurrentPanel {
                id: active.id,
                file: active.file.clone(),
                saved_at: chrono::Utc::now(),
            }),
            open_panels: self
                .panels
                .iter()
                .filter(|panel| !panel.is_home())
                .map(|panel| PersistedPanel {
                    id: panel.id,
                    name: panel.name.clone(),
                    file: panel.file.clone(),
                    connection_id: panel.connection_id(),
                })
                .collect(),
        }
    }

    /// Reopen the panels of a previous run. Entries that cannot be restored are
    /// skipped with a warning; returns how many panels were reopened.
    pub async fn restore(&mut self, snapshot: SessionSnapshot) -> usize {
        let mut restored = 0;

        for entry in snapshot.open_panels {
            if entry.id == HOME_PANEL_ID
                || self.panel(entry.id).is_some()
                || self.panels.iter().any(|panel| panel.file == entry.file)
            {
                warn!("Skipping duplicate restored panel {} ({})", entry.id, entry.file);
                continue;
            }
            let Some(next_id) = entry.id.0.checked_add(1) else {
                warn!("Skipping restored panel {} ({}): id out of range", entry.id, entry.file);
                continue;
            };

            let connection = entry.connection_id.and_then(|id| {
                let found = self.registry.find(id);
                if found.is_none() {
                    warn!("Connection {} of panel {} is gone, restoring unbound", id, entry.id);
                }
                found
            });

            let content = match self.load_restored_content(&entry).await {
                Ok(Some(content)) => content,
                Ok(None) => {
                    warn!("Dropping restored panel {}: {} no longer exists", entry.id, entry.file);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to restore panel {} ({}): {}", entry.id, entry.file, e);
                    continue;
                }
            };

            if let Some(connection) = &connection {
                let seen = self.restored_connection_count(connection, &entry.file);
                let count = self.connection_counts.entry(connection.id).or_insert(0);
                *count = (*count).max(seen);
            }
            self.next_panel_id = self.next_panel_id.max(next_id);

            self.panels.push(Panel {
                id: entry.id,
                name: entry.name,
                connection,
                file: entry.file,
                content: Some(content),
            });
            restored += 1;
        }

        if let Some(current) = snapshot.current_panel {
            let by_file = self
                .panels
                .iter()
                .find(|panel| panel.file == current.file)
                .map(|panel| panel.id);
            let focused = self.set_active_panel(current.id)
                || by_file.is_some_and(|id| self.set_active_panel(id));
            if !focused {
                debug!("Previously active panel {} was not restored", current.id);
            }
        }

        info!("Restored {} panels, active panel is {}", restored, self.active);
        restored
    }

    async fn load_restored_content(
        &self,
        entry: &PersistedPanel,
    ) -> Result<Option<String>, StoreError> {
        if self.file_store.exists(&entry.file).await? {
            return self.file_store.read_file(&entry.file).await.map(Some);
        }
        // Connection panels may never have been saved
        if entry.connection_id.is_some() {
            return Ok(Some(self.config.default_snippet.clone()));
        }
        Ok(None)
    }

    /// Counter value implied by a restored connection file name, so new
    /// connection panels do not reuse its suffix.
    fn restored_connection_count(&self, connection: &Connection, file: &str) -> usize {
        let suffix = format!(".{}", self.config.extension);
        let file_name = file.rsplit('/').next().unwrap_or(file);
        let Some(stem) = file_name.strip_suffix(&suffix) else {
            return 0;
        };
        if stem == connection.name {
            return 1;
        }
        stem.strip_prefix(connection.name.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<usize>().ok())
            .map_or(0, |n| n + 1)
    }
}
