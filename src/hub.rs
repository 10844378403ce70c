//! Multi-backend aggregation with deterministic routing.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::warn;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::connection::{CapabilityKind, Connection, Meta};
use crate::error::{Result, SwitchboardError};
use crate::policy::{self, CapabilityRecord};

/// Merged, filtered listings from one discovery cycle.
#[derive(Debug, Default)]
pub struct DiscoverySnapshot {
    pub tools: Vec<CapabilityRecord>,
    pub resources: Vec<CapabilityRecord>,
    pub prompts: Vec<CapabilityRecord>,
}

impl DiscoverySnapshot {
    pub fn records(&self, kind: CapabilityKind) -> &[CapabilityRecord] {
        match kind {
            CapabilityKind::Tool => &self.tools,
            CapabilityKind::Resource => &self.resources,
            CapabilityKind::Prompt => &self.prompts,
        }
    }
}

/// Aggregates every backend connection behind one routed surface.
///
/// Owns the catalog outright, so independent hubs never share routing state.
#[derive(Debug)]
pub struct Hub {
    connections: Vec<Arc<Connection>>,
    configs: HashMap<String, ServerConfig>,
    catalog: Catalog,
}

impl Hub {
    /// Build a hub over the given connections and per-backend policies.
    ///
    /// Connection names must be unique and every config must be well formed.
    pub fn new(
        connections: Vec<Arc<Connection>>,
        configs: HashMap<String, ServerConfig>,
    ) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for connection in &connections {
            let name = connection.name().trim();
            if name.is_empty() {
                return Err(SwitchboardError::Configuration(
                    "connection name must not be empty".into(),
                ));
            }
            if !seen.insert(name.to_owned()) {
                return Err(SwitchboardError::Configuration(format!(
                    "duplicate connection name '{name}'"
                )));
            }
        }
        for config in configs.values() {
            config.validate()?;
        }

        Ok(Self {
            connections,
            configs,
            catalog: Catalog::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only route lookup for front-ends.
    pub fn resolve(&self, kind: CapabilityKind, name: &str) -> Option<Arc<Connection>> {
        self.catalog.resolve(kind, name)
    }

    /// Run one full discovery cycle across all connections.
    ///
    /// Each kind's routes are rebuilt from scratch: discovery fans out
    /// concurrently, routes are accumulated privately in connection order
    /// (the last writer for an external name wins), and the finished table
    /// replaces the old one in a single swap so concurrent callers never see
    /// a half-built catalog. The returned listings are filtered per backend
    /// policy; routing is not, so a hidden capability stays callable.
    pub async fn refresh_all(&self, meta: Option<&Meta>) -> DiscoverySnapshot {
        let mut snapshot = DiscoverySnapshot::default();
        for kind in CapabilityKind::ALL {
            let merged = self.refresh_kind(kind, meta).await;
            match kind {
                CapabilityKind::Tool => snapshot.tools = merged,
                CapabilityKind::Resource => snapshot.resources = merged,
                CapabilityKind::Prompt => snapshot.prompts = merged,
            }
        }
        snapshot
    }

    async fn refresh_kind(
        &self,
        kind: CapabilityKind,
        meta: Option<&Meta>,
    ) -> Vec<CapabilityRecord> {
        let discoveries = join_all(self.connections.iter().map(|connection| {
            let config = self.config_for(connection.name(), kind);
            async move {
                (
                    connection,
                    policy::discover_from(connection, config, kind, meta).await,
                )
            }
        }))
        .await;

        let mut routes: HashMap<String, Arc<Connection>> = HashMap::new();
        let mut merged = Vec::new();
        for (connection, records) in discoveries {
            for record in &records {
                let previous = routes.insert(
                    record.external_name.clone(),
                    Arc::clone(&record.connection),
                );
                if let Some(previous) = previous {
                    warn!(
                        name = %record.external_name,
                        %kind,
                        winner = connection.name(),
                        loser = previous.name(),
                        "external name collision; later backend wins"
                    );
                }
            }
            let config = self.config_for(connection.name(), kind);
            merged.extend(policy::filter_for_listing(records, config));
        }

        self.catalog.swap(kind, routes);
        merged
    }

    /// Route one inbound call to the owning backend.
    ///
    /// Fails `NotFound` when no route exists, enforces exposure policy
    /// against the owning connection's config, then dispatches. Backend
    /// failures propagate unchanged; nothing is retried here.
    pub async fn call(
        &self,
        kind: CapabilityKind,
        external_name: &str,
        args: Value,
        meta: Option<&Meta>,
    ) -> Result<Value> {
        let connection = self.catalog.resolve(kind, external_name).ok_or_else(|| {
            SwitchboardError::NotFound {
                kind,
                name: external_name.to_owned(),
            }
        })?;

        let original_name = connection.original_name(external_name);
        let config = self.config_for(connection.name(), kind);
        policy::validate_access(external_name, original_name.as_deref(), config)?;

        policy::dispatch(external_name, args, &connection, kind, meta).await
    }

    /// Exposure lists are defined for tools only; other kinds carry no
    /// per-backend policy.
    fn config_for(&self, connection_name: &str, kind: CapabilityKind) -> Option<&ServerConfig> {
        match kind {
            CapabilityKind::Tool => self.configs.get(connection_name),
            CapabilityKind::Resource | CapabilityKind::Prompt => None,
        }
    }
}
