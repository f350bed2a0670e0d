// ABOUTME: Connection registry the session core resolves connection identities through

use crate::models::{Connection, ConnectionId};
use std::collections::BTreeMap;
use std::sync::Arc;

pub trait ConnectionRegistry: Send + Sync {
    fn find(&self, id: ConnectionId) -> Option<Arc<Connection>>;
    fn list(&self) -> Vec<Arc<Connection>>;
}

/// Registry over a fixed set of connections, typically loaded from config.
#[derive(Debug, Default, Clone)]
pub struct StaticConnectionRegistry {
    connections: BTreeMap<ConnectionId, Arc<Connection>>,
}

impl StaticConnectionRegistry {
    pub fn new<I>(connections: I) -> Self
    where
        I: IntoIterator<Item = Connection>,
    {
        Self {
            connections: connections
                .into_iter()
                .map(|connection| (connection.id, Arc::new(connection)))
                .collect(),
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<Connection>> {
        self.connections
            .values()
            .find(|connection| connection.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

impl ConnectionRegistry for StaticConnectionRegistry {
    fn find(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(&id).cloned()
    }

    fn list(&self) -> Vec<Arc<Connection>> {
        self.connections.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id_and_name() {
        let registry = StaticConnectionRegistry::new([
            Connection::new(1, "Acme"),
            Connection::new(2, "Logs"),
        ]);

        assert_eq!(registry.find(ConnectionId(2)).unwrap().name, "Logs");
        assert!(registry.find(ConnectionId(9)).is_none());
        assert_eq!(registry.find_by_name("acme").unwrap().id, ConnectionId(1));
        assert_eq!(registry.list().len(), 2);
    }
}
