//! Exposure policy: renaming, filtering, access validation, and dispatch.
//!
//! Registration and listing are deliberately separate concerns. Every
//! capability a backend reports gets a route (it stays callable), while the
//! allow/deny lists only govern what a listing shows.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, warn};

use crate::config::{ExposedTool, ServerConfig};
use crate::connection::{CapabilityKind, Connection, Meta};
use crate::error::{Result, SwitchboardError};

/// One discovered capability bound to its owning connection.
///
/// Transient: recomputed on every discovery cycle, never persisted.
#[derive(Clone)]
pub struct CapabilityRecord {
    pub kind: CapabilityKind,
    /// Name as the backend knows it.
    pub name: String,
    /// Name callers see; differs from `name` only when a rename applies.
    pub external_name: String,
    /// Backend description, prefixed with the owning connection's name.
    pub description: String,
    pub input_schema: Option<Value>,
    pub connection: Arc<Connection>,
}

impl std::fmt::Debug for CapabilityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRecord")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("external_name", &self.external_name)
            .field("connection", &self.connection.name())
            .finish_non_exhaustive()
    }
}

/// The externally visible name for `original` under `config`.
///
/// Only `Renamed` entries rename; plain allow-list entries pass the name
/// through unchanged, as does an absent config.
pub fn compute_external_name(original: &str, config: Option<&ServerConfig>) -> String {
    config
        .and_then(|c| c.rename_for(original))
        .map_or_else(|| original.to_owned(), str::to_owned)
}

/// Query one connection for its capabilities of `kind`.
///
/// Decorates each description with a `[connection_name] ` prefix, computes
/// external names, and records reverse translations on the connection when a
/// rename occurred. A listing failure is degraded to an empty list for this
/// connection only, so one failing backend cannot abort discovery of the
/// others.
pub async fn discover_from(
    connection: &Arc<Connection>,
    config: Option<&ServerConfig>,
    kind: CapabilityKind,
    meta: Option<&Meta>,
) -> Vec<CapabilityRecord> {
    let raw = match connection.transport().list_capabilities(kind, meta).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(
                server = connection.name(),
                %kind,
                %err,
                "capability discovery failed; treating backend as empty"
            );
            return Vec::new();
        }
    };

    raw.into_iter()
        .map(|capability| {
            let external_name = compute_external_name(&capability.name, config);
            if external_name != capability.name {
                connection.record_mapping(&external_name, &capability.name);
            }
            CapabilityRecord {
                kind,
                external_name,
                description: format!(
                    "[{}] {}",
                    connection.name(),
                    capability.description.unwrap_or_default()
                ),
                input_schema: capability.input_schema,
                name: capability.name,
                connection: Arc::clone(connection),
            }
        })
        .collect()
}

/// Apply listing-time filtering. Allow-list membership is checked against
/// *original* names (covering both plain and renamed entries); the deny-list
/// applies only when no allow-list is configured.
pub fn filter_for_listing(
    records: Vec<CapabilityRecord>,
    config: Option<&ServerConfig>,
) -> Vec<CapabilityRecord> {
    let Some(config) = config else {
        return records;
    };

    if let Some(exposed) = &config.exposed_tools {
        let keep: HashSet<&str> = exposed.iter().map(ExposedTool::check_name).collect();
        return records
            .into_iter()
            .filter(|record| keep.contains(record.name.as_str()))
            .collect();
    }

    if let Some(hidden) = &config.hidden_tools {
        return records
            .into_iter()
            .filter(|record| !hidden.iter().any(|name| name == &record.name))
            .collect();
    }

    records
}

/// Enforce exposure policy before a call is forwarded.
///
/// The canonical check name is the original backend name when a rename
/// applies, else the external name. An active allow-list that does not
/// contain it fails `NotExposed` (an empty allow-list denies everything);
/// with no allow-list, a deny-list hit fails `Hidden`.
pub fn validate_access(
    external_name: &str,
    original_name: Option<&str>,
    config: Option<&ServerConfig>,
) -> Result<()> {
    let Some(config) = config else {
        return Ok(());
    };
    let check_name = original_name.unwrap_or(external_name);

    if let Some(exposed) = &config.exposed_tools {
        if exposed.iter().any(|entry| entry.check_name() == check_name) {
            return Ok(());
        }
        return Err(SwitchboardError::NotExposed {
            name: external_name.to_owned(),
        });
    }

    if let Some(hidden) = &config.hidden_tools {
        if hidden.iter().any(|name| name == check_name) {
            return Err(SwitchboardError::Hidden {
                name: external_name.to_owned(),
            });
        }
    }

    Ok(())
}

/// Non-raising form of the same precedence rule, for cross-backend
/// aggregation. A connection with no config defaults to allowed.
pub fn is_allowed(
    name: &str,
    connection_name: &str,
    configs: &HashMap<String, ServerConfig>,
) -> bool {
    let Some(config) = configs.get(connection_name) else {
        return true;
    };

    if let Some(exposed) = &config.exposed_tools {
        return exposed.iter().any(|entry| entry.check_name() == name);
    }

    if let Some(hidden) = &config.hidden_tools {
        return !hidden.iter().any(|hidden_name| hidden_name == name);
    }

    true
}

/// Forward a call through the owning connection.
///
/// The name sent to the backend is the reverse-translated original when one
/// was recorded, else the external name itself. Failures are logged with
/// call context and returned unmodified; this layer never retries.
pub async fn dispatch(
    external_name: &str,
    args: Value,
    connection: &Arc<Connection>,
    kind: CapabilityKind,
    meta: Option<&Meta>,
) -> Result<Value> {
    let call_name = connection
        .original_name(external_name)
        .unwrap_or_else(|| external_name.to_owned());

    match connection
        .transport()
        .call_capability(kind, &call_name, args, meta)
        .await
    {
        Ok(result) => Ok(result),
        Err(err) => {
            error!(
                name = external_name,
                server = connection.name(),
                %kind,
                %err,
                "backend call failed"
            );
            Err(err)
        }
    }
}
