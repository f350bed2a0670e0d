// ABOUTME: Event handling for line commands and the panel actions they map to

use crate::app::AppState;
use crate::models::PanelId;
use thiserror::Error;

pub const HELP_TEXT: &str = "\
Commands:
  list                      show open panels (* marks the active one)
  show                      print the active panel and its buffer
  open <file>               open a search file or focus the panel showing it
  connections               list configured connections
  connect <id|name>         open a panel for a connection
  switch <panel-id>         focus a panel
  write <text>              replace the active buffer and save if the file exists (\\n for newlines)
  close [<panel-id>] [--save]
                            close a panel (active one by default), saving first with --save
  exists [<panel-id>]       check whether the panel's file exists
  snippet                   reset the active buffer to the default snippet
  help                      show this help
  quit                      persist the session and exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    Help,
    ListPanels,
    ShowActive,
    ListConnections,
    OpenFile(String),
    OpenConnection(String),
    SwitchPanel(PanelId),
    WriteContent(String),
    ClosePanel { panel: Option<PanelId>, save: bool },
    CheckExists(Option<PanelId>),
    LoadSnippet,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid panel id: {0}")]
    InvalidPanelId(String),
}

pub struct EventHandler;

impl EventHandler {
    /// Parse one input line. Blank lines map to no event.
    pub fn handle_line(line: &str) -> Result<Option<AppEvent>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));

        let event = match command {
            "quit" | "exit" | "q" => AppEvent::Quit,
            "help" | "?" => AppEvent::Help,
            "list" | "ls" => AppEvent::ListPanels,
            "show" => AppEvent::ShowActive,
            "connections" => AppEvent::ListConnections,
            "open" => AppEvent::OpenFile(Self::required(rest, "file")?.to_string()),
            "connect" => AppEvent::OpenConnection(Self::required(rest, "connection")?.to_string()),
            "switch" => AppEvent::SwitchPanel(Self::parse_panel_id(Self::required(rest, "panel id")?)?),
            "write" => AppEvent::WriteContent(rest.replace("\\n", "\n")),
            "close" => Self::parse_close(rest)?,
            "exists" => AppEvent::CheckExists(Self::optional_panel_id(rest)?),
            "snippet" => AppEvent::LoadSnippet,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(Some(event))
    }

    fn required<'a>(rest: &'a str, name: &'static str) -> Result<&'a str, CommandError> {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(name))
        } else {
            Ok(rest)
        }
    }

    fn parse_panel_id(raw: &str) -> Result<PanelId, CommandError> {
        raw.parse::<u64>()
            .map(PanelId)
            .map_err(|_| CommandError::InvalidPanelId(raw.to_string()))
    }

    fn optional_panel_id(raw: &str) -> Result<Option<PanelId>, CommandError> {
        if raw.is_empty() {
            Ok(None)
        } else {
            Self::parse_panel_id(raw).map(Some)
        }
    }

    fn parse_close(rest: &str) -> Result<AppEvent, CommandError> {
        let mut panel = None;
        let mut save = false;
        for token in rest.split_whitespace() {
            if token == "--save" {
                save = true;
            } else {
                panel = Some(Self::parse_panel_id(token)?);
            }
        }
        Ok(AppEvent::ClosePanel { panel, save })
    }

    /// Apply an event to the state and return the text to show the user.
    pub async fn process_event(event: AppEvent, state: &mut AppState) -> String {
        match event {
            AppEvent::Quit => {
                state.quit();
                String::new()
            }
            AppEvent::Help => HELP_TEXT.to_string(),
            AppEvent::ListPanels => state.render_panels(),
            AppEvent::ShowActive => state.render_active(),
            AppEvent::ListConnections => state.render_connections(),
            AppEvent::OpenFile(path) => match state.manager.establish_panel(path.as_str()).await {
                Ok(id) => format!("Active panel: {id}\n"),
                Err(e) => format!("error [{}]: {}\n", e.code(), e),
            },
            AppEvent::OpenConnection(key) => {
                let Some(connection) = state.find_connection(&key) else {
                    return format!("Unknown connection: {key}\n");
                };
                match state.manager.establish_panel(connection).await {
                    Ok(id) => format!("Active panel: {} ({})\n", id, state.manager.active_panel().file),
                    Err(e) => format!("error [{}]: {}\n", e.code(), e),
                }
            }
            AppEvent::SwitchPanel(id) => {
                if state.manager.set_active_panel(id) {
                    format!("Active panel: {id}\n")
                } else {
                    format!("No panel {id}\n")
                }
            }
            AppEvent::WriteContent(content) => {
                match state.manager.save_content(None, content, false).await {
                    Ok(()) => {
                        let active = state.manager.active_panel_id();
                        match state.manager.check_file_exists(Some(active)).await {
                            Ok(true) => format!("Saved {}\n", state.manager.active_panel().file),
                            Ok(false) => "Buffer updated (file not created yet)\n".to_string(),
                            Err(e) => format!("error: {e}\n"),
                        }
                    }
                    Err(e) => format!("error [{}]: {}\n", e.code(), e),
                }
            }
            AppEvent::ClosePanel { panel, save } => {
                let target = panel.unwrap_or_else(|| state.manager.active_panel_id());
                match state.manager.close_panel(Some(target), save).await {
                    Ok(()) => format!("Active panel: {}\n", state.manager.active_panel_id()),
                    Err(e) => format!("error [{}]: {}\n", e.code(), e),
                }
            }
            AppEvent::CheckExists(panel) => match state.manager.check_file_exists(panel).await {
                Ok(exists) => format!("{exists}\n"),
                Err(e) => format!("error: {e}\n"),
            },
            AppEvent::LoadSnippet => {
                state.manager.load_default_snippet();
                state.render_active()
            }
        }
    }
}
