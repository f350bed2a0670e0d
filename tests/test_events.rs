// ABOUTME: Unit tests for command handling to ensure input lines map to correct panel actions

use dockit_panels::app::{AppEvent, AppState, CommandError, EventHandler};
use dockit_panels::config::SessionConfig;
use dockit_panels::models::{Connection, PanelId, HOME_PANEL_ID};
use dockit_panels::registry::StaticConnectionRegistry;
use dockit_panels::session::{PanelSessionManager, SessionPersistence};
use dockit_panels::store::{KeyValueStore, MemoryFileStore, MemoryKvStore};
use std::sync::Arc;

fn create_state(store: Arc<MemoryFileStore>) -> AppState {
    let registry = Arc::new(StaticConnectionRegistry::new([
        Connection::new(1, "Acme"),
        Connection::new(2, "Logs"),
    ]));
    let manager = PanelSessionManager::new(store, registry.clone(), SessionConfig::default());
    AppState::new(manager, registry)
}

#[test]
fn test_quit_commands() {
    for line in ["quit", "exit", "q", "  quit  "] {
        assert_eq!(EventHandler::handle_line(line), Ok(Some(AppEvent::Quit)));
    }
}

#[test]
fn test_blank_line_is_no_event() {
    assert_eq!(EventHandler::handle_line(""), Ok(None));
    assert_eq!(EventHandler::handle_line("   "), Ok(None));
}

#[test]
fn test_open_and_connect_take_arguments() {
    assert_eq!(
        EventHandler::handle_line("open reports/q1.search"),
        Ok(Some(AppEvent::OpenFile("reports/q1.search".to_string())))
    );
    assert_eq!(
        EventHandler::handle_line("connect Acme"),
        Ok(Some(AppEvent::OpenConnection("Acme".to_string())))
    );
    assert_eq!(
        EventHandler::handle_line("open"),
        Err(CommandError::MissingArgument("file"))
    );
}

#[test]
fn test_close_variants() {
    assert_eq!(
        EventHandler::handle_line("close"),
        Ok(Some(AppEvent::ClosePanel { panel: None, save: false }))
    );
    assert_eq!(
        EventHandler::handle_line("close 3 --save"),
        Ok(Some(AppEvent::ClosePanel { panel: Some(PanelId(3)), save: true }))
    );
    assert_eq!(
        EventHandler::handle_line("close --save"),
        Ok(Some(AppEvent::ClosePanel { panel: None, save: true }))
    );
    assert_eq!(
        EventHandler::handle_line("close three"),
        Err(CommandError::InvalidPanelId("three".to_string()))
    );
}

#[test]
fn test_connections_command() {
    assert_eq!(
        EventHandler::handle_line("connections"),
        Ok(Some(AppEvent::ListConnections))
    );
}

#[test]
fn test_write_unescapes_newlines() {
    assert_eq!(
        EventHandler::handle_line(r"write GET _search\n{}"),
        Ok(Some(AppEvent::WriteContent("GET _search\n{}".to_string())))
    );
}

#[test]
fn test_unknown_command() {
    assert_eq!(
        EventHandler::handle_line("frobnicate"),
        Err(CommandError::UnknownCommand("frobnicate".to_string()))
    );
}

#[tokio::test]
async fn test_connect_by_name_or_id_then_close() {
    let mut state = create_state(Arc::new(MemoryFileStore::new()));

    let output = EventHandler::process_event(AppEvent::OpenConnection("acme".to_string()), &mut state).await;
    assert_eq!(output, "Active panel: 2 (Acme.search)\n");

    let output = EventHandler::process_event(AppEvent::OpenConnection("1".to_string()), &mut state).await;
    assert_eq!(output, "Active panel: 3 (Acme-1.search)\n");

    let output = EventHandler::process_event(AppEvent::OpenConnection("nope".to_string()), &mut state).await;
    assert_eq!(output, "Unknown connection: nope\n");

    let output = EventHandler::process_event(
        AppEvent::ClosePanel { panel: None, save: false },
        &mut state,
    )
    .await;
    assert_eq!(output, "Active panel: 2\n");
}

#[tokio::test]
async fn test_list_marks_active_panel() {
    let store = Arc::new(MemoryFileStore::with_files([("a.search", "a")]));
    let mut state = create_state(store);
    EventHandler::process_event(AppEvent::OpenFile("a.search".to_string()), &mut state).await;

    let listing = EventHandler::process_event(AppEvent::ListPanels, &mut state).await;
    let lines: Vec<&str> = listing.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(' '));
    assert!(lines[0].ends_with("home"));
    assert!(lines[1].starts_with('*'));
    assert!(lines[1].ends_with("a.search"));
}

#[tokio::test]
async fn test_connections_listed_by_id() {
    let mut state = create_state(Arc::new(MemoryFileStore::new()));

    let output = EventHandler::process_event(AppEvent::ListConnections, &mut state).await;
    assert_eq!(output, "    1  Acme\n    2  Logs\n");

    let manager = PanelSessionManager::new(
        Arc::new(MemoryFileStore::new()),
        Arc::new(StaticConnectionRegistry::default()),
        SessionConfig::default(),
    );
    let mut empty = AppState::new(manager, Arc::new(StaticConnectionRegistry::default()));
    let output = EventHandler::process_event(AppEvent::ListConnections, &mut empty).await;
    assert_eq!(output, "No connections configured\n");
}

#[tokio::test]
async fn test_errors_are_reported_with_codes() {
    let mut state = create_state(Arc::new(MemoryFileStore::new()));

    let output = EventHandler::process_event(AppEvent::OpenFile("missing.search".to_string()), &mut state).await;
    assert_eq!(output, "error [500]: File not found: missing.search\n");

    EventHandler::process_event(AppEvent::OpenConnection("Logs".to_string()), &mut state).await;
    let output = EventHandler::process_event(
        AppEvent::ClosePanel { panel: None, save: true },
        &mut state,
    )
    .await;
    assert_eq!(output, "error [500]: Folder not found\n");
}

#[tokio::test]
async fn test_write_reports_deferred_materialization() {
    let store = Arc::new(MemoryFileStore::with_files([("a.search", "a")]));
    let mut state = create_state(store.clone());

    EventHandler::process_event(AppEvent::OpenConnection("Acme".to_string()), &mut state).await;
    let output = EventHandler::process_event(AppEvent::WriteContent("GET x".to_string()), &mut state).await;
    assert_eq!(output, "Buffer updated (file not created yet)\n");

    EventHandler::process_event(AppEvent::OpenFile("a.search".to_string()), &mut state).await;
    let output = EventHandler::process_event(AppEvent::WriteContent("GET y".to_string()), &mut state).await;
    assert_eq!(output, "Saved a.search\n");
    assert_eq!(store.get("a.search").as_deref(), Some("GET y"));
}

#[tokio::test]
async fn test_switch_and_quit() {
    let mut state = create_state(Arc::new(MemoryFileStore::new()));

    let output = EventHandler::process_event(AppEvent::SwitchPanel(PanelId(5)), &mut state).await;
    assert_eq!(output, "No panel 5\n");

    let output = EventHandler::process_event(AppEvent::SwitchPanel(HOME_PANEL_ID), &mut state).await;
    assert_eq!(output, "Active panel: 0\n");

    EventHandler::process_event(AppEvent::Quit, &mut state).await;
    assert!(state.should_quit);
}

#[tokio::test]
async fn test_persist_and_restore_through_app_state() {
    let store = Arc::new(MemoryFileStore::with_files([("a.search", "a")]));
    let kv = Arc::new(MemoryKvStore::new());

    let mut state = create_state(store.clone()).with_persistence(SessionPersistence::new(kv.clone()));
    EventHandler::process_event(AppEvent::OpenFile("a.search".to_string()), &mut state).await;
    state.persist_session().unwrap();
    assert!(kv.get("currentPanel").unwrap().is_some());

    let mut next = create_state(store).with_persistence(SessionPersistence::new(kv));
    assert_eq!(next.restore_session().await, 1);
    assert_eq!(next.manager.active_panel().file, "a.search");
}

#[tokio::test]
async fn test_clear_session_forgets_saved_panels() {
    let store = Arc::new(MemoryFileStore::with_files([("a.search", "a")]));
    let kv = Arc::new(MemoryKvStore::new());

    let mut state = create_state(store.clone()).with_persistence(SessionPersistence::new(kv.clone()));
    EventHandler::process_event(AppEvent::OpenFile("a.search".to_string()), &mut state).await;
    state.persist_session().unwrap();

    let mut next = create_state(store).with_persistence(SessionPersistence::new(kv.clone()));
    next.clear_session().unwrap();
    assert!(kv.get("currentPanel").unwrap().is_none());
    assert!(kv.get("openPanels").unwrap().is_none());
    assert_eq!(next.restore_session().await, 0);
    assert_eq!(next.manager.active_panel_id(), HOME_PANEL_ID);
}
