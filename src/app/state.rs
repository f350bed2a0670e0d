// ABOUTME: Application state wiring the panel session manager to its collaborators
// Owns the manager, the connection registry and the snapshot persistence hook

use crate::config::AppConfig;
use crate::models::{Connection, ConnectionId, Panel};
use crate::registry::StaticConnectionRegistry;
use crate::session::{PanelSessionManager, SessionPersistence};
use crate::store::{FileStore, JsonFileKvStore, LocalFileStore, StoreError};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    pub manager: PanelSessionManager,
    pub registry: Arc<StaticConnectionRegistry>,
    pub persistence: Option<SessionPersistence>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(manager: PanelSessionManager, registry: Arc<StaticConnectionRegistry>) -> Self {
        Self {
            manager,
            registry,
            persistence: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_persistence(mut self, persistence: SessionPersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Resolve a connection by numeric id first, then by display name.
    pub fn find_connection(&self, key: &str) -> Option<Arc<Connection>> {
        use crate::registry::ConnectionRegistry;

        key.parse::<u64>()
            .ok()
            .and_then(|id| self.registry.find(ConnectionId(id)))
            .or_else(|| self.registry.find_by_name(key))
    }

    /// Reopen the panels saved by the previous run, if persistence is configured.
    pub async fn restore_session(&mut self) -> usize {
        let Some(persistence) = &self.persistence else {
            return 0;
        };
        match persistence.load() {
            Ok(snapshot) => self.manager.restore(snapshot).await,
            Err(e) => {
                warn!("Failed to load persisted session: {}", e);
                0
            }
        }
    }

    /// Forget the panels saved by the previous run.
    pub fn clear_session(&self) -> Result<(), StoreError> {
        if let Some(persistence) = &self.persistence {
            persistence.clear()?;
        }
        Ok(())
    }

    pub fn persist_session(&self) -> Result<(), StoreError> {
        if let Some(persistence) = &self.persistence {
            persistence.save(&self.manager.snapshot())?;
        }
        Ok(())
    }

    /// One line per panel, the active one marked with `*`.
    pub fn render_panels(&self) -> String {
        let active = self.manager.active_panel_id();
        let mut out = String::new();
        for panel in self.manager.panels() {
            let marker = if panel.id == active { '*' } else { ' ' };
            let _ = writeln!(out, "{} {:>3}  {}", marker, panel.id, panel.label());
        }
        out
    }

    pub fn render_connections(&self) -> String {
        use crate::registry::ConnectionRegistry;

        let connections = self.registry.list();
        if connections.is_empty() {
            return "No connections configured\n".to_string();
        }
        let mut out = String::new();
        for connection in connections {
            let _ = writeln!(out, "{:>5}  {}", connection.id, connection.name);
        }
        out
    }

    pub fn render_active(&self) -> String {
        render_panel(self.manager.active_panel())
    }
}

fn render_panel(panel: &Panel) -> String {
    let mut out = format!("[{}] {}", panel.id, panel.label());
    if !panel.file.is_empty() {
        let _ = write!(out, " -> {}", panel.file);
    }
    out.push('\n');
    if let Some(content) = &panel.content {
        out.push_str(content);
        if !content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the application against the local file system.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.workspace_root).with_context(|| {
            format!(
                "Failed to create workspace directory: {}",
                config.workspace_root.display()
            )
        })?;

        let file_store: Arc<dyn FileStore> = Arc::new(
            LocalFileStore::new(&config.workspace_root)
                .with_default_folder(config.default_folder.clone()),
        );
        let registry = Arc::new(StaticConnectionRegistry::new(config.connections.clone()));
        let manager =
            PanelSessionManager::new(file_store, registry.clone(), config.session.clone());

        let kv = JsonFileKvStore::open(&config.state_file).with_context(|| {
            format!("Failed to open session state: {}", config.state_file.display())
        })?;
        let persistence = SessionPersistence::new(Arc::new(kv));

        info!(
            "Workspace {} with {} known connections",
            config.workspace_root.display(),
            config.connections.len()
        );
        Ok(Self::new(
            AppState::new(manager, registry).with_persistence(persistence),
        ))
    }

    /// Start from only the home panel and drop the saved snapshot.
    pub fn init_fresh(&self) {
        match self.state.clear_session() {
            Ok(()) => info!("Session started fresh"),
            Err(e) => warn!("Failed to clear persisted session: {}", e),
        }
    }

    pub async fn init(&mut self) {
        let restored = self.state.restore_session().await;
        info!("Session started with {} restored panels", restored);
    }

    pub fn shutdown(&self) {
        if let Err(e) = self.state.persist_session() {
            warn!("Failed to persist session: {}", e);
        }
    }
}
