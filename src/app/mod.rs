// ABOUTME: Application structure and command handling for the panel session driver

pub mod events;
pub mod state;

pub use events::{AppEvent, CommandError, EventHandler};
pub use state::{App, AppState};
