// ABOUTME: Connection identity as seen by the panel session core
// The manager only reads the id and display name, it never mutates a connection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a database connection known to the connection registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A database connection a search panel can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub name: String,
}

impl Connection {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ConnectionId(id),
            name: name.into(),
        }
    }
}
