//! Switchboard -- capability aggregation and routing core
//!
//! Aggregates several independent MCP-style backends behind one surface:
//! discovers each backend's tools, resources, and prompts, renames and
//! filters them per backend policy, and routes inbound calls to the owning
//! backend while translating names back to what the backend expects.
//!
//! Wire transport and protocol framing live behind the [`connection::BackendTransport`]
//! seam; this crate owns the catalog, the exposure policy, and the
//! environment templating used to materialize backend launch configuration.

pub mod catalog;
pub mod config;
pub mod connection;
pub mod error;
pub mod hub;
pub mod policy;
pub mod prelude;
pub mod templating;
