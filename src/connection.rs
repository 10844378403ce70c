//! Backend connections and the connection-manager collaborator seam.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// The three capability families a backend can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Tool,
    Resource,
    Prompt,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::Tool,
        CapabilityKind::Resource,
        CapabilityKind::Prompt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tool => "tool",
            Self::Resource => "resource",
            Self::Prompt => "prompt",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request metadata forwarded to backends untouched.
pub type Meta = serde_json::Map<String, Value>;

/// One raw capability as reported by a backend listing.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
}

impl Capability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Transport operations the connection manager supplies for one backend.
///
/// This layer never frames wire traffic itself; it only asks for capability
/// listings and forwards calls. Transport-level failures surface as errors.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    async fn list_capabilities(
        &self,
        kind: CapabilityKind,
        meta: Option<&Meta>,
    ) -> Result<Vec<Capability>>;

    async fn call_capability(
        &self,
        kind: CapabilityKind,
        name: &str,
        args: Value,
        meta: Option<&Meta>,
    ) -> Result<Value>;
}

/// A live session to one backend.
///
/// Holds the private translation table mapping externally exposed names back
/// to the backend's original names. The table is written only during
/// discovery and read on every dispatch.
pub struct Connection {
    name: String,
    transport: Arc<dyn BackendTransport>,
    name_mappings: RwLock<HashMap<String, String>>,
}

impl Connection {
    pub fn new(name: impl Into<String>, transport: Arc<dyn BackendTransport>) -> Self {
        Self {
            name: name.into(),
            transport,
            name_mappings: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transport(&self) -> &Arc<dyn BackendTransport> {
        &self.transport
    }

    /// Record that callers know `original` as `external`.
    pub fn record_mapping(&self, external: impl Into<String>, original: impl Into<String>) {
        self.name_mappings
            .write()
            .unwrap()
            .insert(external.into(), original.into());
    }

    /// The backend-side name for an external name, when a rename applies.
    pub fn original_name(&self, external: &str) -> Option<String> {
        self.name_mappings.read().unwrap().get(external).cloned()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("name_mappings", &self.name_mappings)
            .finish_non_exhaustive()
    }
}
