//! Convenience re-exports for common use.

pub use crate::catalog::Catalog;
pub use crate::config::{EnvVarConfig, ExposedTool, ServerConfig};
pub use crate::connection::{BackendTransport, Capability, CapabilityKind, Connection, Meta};
pub use crate::error::{Result, SwitchboardError};
pub use crate::hub::{DiscoverySnapshot, Hub};
pub use crate::policy::CapabilityRecord;
pub use crate::templating::{combine_env_vars, expand_env_vars, unexpand_env_vars};
