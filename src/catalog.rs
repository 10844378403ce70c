//! Name-to-connection routing tables for aggregated capabilities.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::connection::{CapabilityKind, Connection};

type RouteTable = RwLock<HashMap<String, Arc<Connection>>>;

/// Three independent routing tables, one per capability kind.
///
/// Keys are externally visible names. Within a kind, the last writer for a
/// given name wins; a collision across backends is overwritten silently at
/// this level (callers may log it). Entries are rebuilt from nothing on
/// every discovery cycle, so a disconnected backend cannot leave a stale
/// route behind.
#[derive(Debug, Default)]
pub struct Catalog {
    tools: RouteTable,
    resources: RouteTable,
    prompts: RouteTable,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: CapabilityKind) -> &RouteTable {
        match kind {
            CapabilityKind::Tool => &self.tools,
            CapabilityKind::Resource => &self.resources,
            CapabilityKind::Prompt => &self.prompts,
        }
    }

    /// Look up the connection owning an external name. Never errors; callers
    /// translate `None` into a not-found error.
    pub fn resolve(&self, kind: CapabilityKind, external_name: &str) -> Option<Arc<Connection>> {
        self.table(kind).read().unwrap().get(external_name).cloned()
    }

    /// Insert or overwrite a route; the last writer for a name wins.
    pub fn register(
        &self,
        kind: CapabilityKind,
        external_name: impl Into<String>,
        connection: Arc<Connection>,
    ) {
        self.table(kind)
            .write()
            .unwrap()
            .insert(external_name.into(), connection);
    }

    /// Remove every route of one kind.
    pub fn clear(&self, kind: CapabilityKind) {
        self.table(kind).write().unwrap().clear();
    }

    /// Replace a kind's whole table in one step.
    ///
    /// Refresh builds its routes privately and swaps them in here, so a
    /// concurrent reader never observes a partially rebuilt table.
    pub fn swap(&self, kind: CapabilityKind, routes: HashMap<String, Arc<Connection>>) {
        *self.table(kind).write().unwrap() = routes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;

    use crate::connection::{BackendTransport, Capability, Meta};
    use crate::error::Result;

    struct NullTransport;

    #[async_trait]
    impl BackendTransport for NullTransport {
        async fn list_capabilities(
            &self,
            _kind: CapabilityKind,
            _meta: Option<&Meta>,
        ) -> Result<Vec<Capability>> {
            Ok(Vec::new())
        }

        async fn call_capability(
            &self,
            _kind: CapabilityKind,
            _name: &str,
            args: Value,
            _meta: Option<&Meta>,
        ) -> Result<Value> {
            Ok(args)
        }
    }

    fn connection(name: &str) -> Arc<Connection> {
        Arc::new(Connection::new(name, Arc::new(NullTransport)))
    }

    #[test]
    fn kinds_route_independently() {
        let catalog = Catalog::new();
        let conn = connection("alpha");

        catalog.register(CapabilityKind::Tool, "x", Arc::clone(&conn));

        assert!(catalog.resolve(CapabilityKind::Tool, "x").is_some());
        assert!(catalog.resolve(CapabilityKind::Resource, "x").is_none());
        assert!(catalog.resolve(CapabilityKind::Prompt, "x").is_none());
    }

    #[test]
    fn last_writer_wins_for_a_name() {
        let catalog = Catalog::new();

        catalog.register(CapabilityKind::Tool, "x", connection("first"));
        catalog.register(CapabilityKind::Tool, "x", connection("second"));

        let owner = catalog
            .resolve(CapabilityKind::Tool, "x")
            .expect("route should exist");
        assert_eq!(owner.name(), "second");
    }

    #[test]
    fn clear_removes_only_that_kind() {
        let catalog = Catalog::new();
        catalog.register(CapabilityKind::Tool, "x", connection("alpha"));
        catalog.register(CapabilityKind::Prompt, "p", connection("alpha"));

        catalog.clear(CapabilityKind::Tool);

        assert!(catalog.resolve(CapabilityKind::Tool, "x").is_none());
        assert!(catalog.resolve(CapabilityKind::Prompt, "p").is_some());
    }

    #[test]
    fn swap_replaces_the_whole_table() {
        let catalog = Catalog::new();
        catalog.register(CapabilityKind::Tool, "old", connection("alpha"));

        let mut routes = HashMap::new();
        routes.insert("new".to_owned(), connection("beta"));
        catalog.swap(CapabilityKind::Tool, routes);

        assert!(catalog.resolve(CapabilityKind::Tool, "old").is_none());
        let owner = catalog
            .resolve(CapabilityKind::Tool, "new")
            .expect("swapped route should exist");
        assert_eq!(owner.name(), "beta");
    }
}
