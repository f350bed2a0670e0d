// ABOUTME: Core data models for panels and the connections they are bound to

pub mod connection;
pub mod panel;

pub use connection::{Connection, ConnectionId};
pub use panel::{Panel, PanelId, HOME_PANEL_ID, HOME_PANEL_NAME};
