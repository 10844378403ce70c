//! Per-backend exposure policy and environment templating configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwitchboardError};

/// One entry of an `exposedTools` allow-list.
///
/// The wire shape is either a bare string (pass-through, no rename) or a
/// `{ original, exposed }` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExposedTool {
    /// Expose the tool under its original name.
    Plain(String),
    /// Expose `original` to callers as `exposed`.
    Renamed { original: String, exposed: String },
}

impl ExposedTool {
    /// The original-name side of the entry, used for allow-list membership
    /// checks regardless of renaming.
    pub fn check_name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Renamed { original, .. } => original,
        }
    }

    /// The name callers see for this entry.
    pub fn exposed_name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Renamed { exposed, .. } => exposed,
        }
    }
}

/// Exposure policy for one backend server.
///
/// When `exposed_tools` is present it is an exhaustive allow-list and
/// `hidden_tools` is ignored entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposed_tools: Option<Vec<ExposedTool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_tools: Option<Vec<String>>,
}

impl ServerConfig {
    /// Reject malformed entries (empty names on either side of a rename).
    pub fn validate(&self) -> Result<()> {
        let Some(exposed) = &self.exposed_tools else {
            return Ok(());
        };
        for entry in exposed {
            match entry {
                ExposedTool::Plain(name) if name.trim().is_empty() => {
                    return Err(SwitchboardError::Configuration(
                        "exposedTools entry must not be empty".into(),
                    ));
                }
                ExposedTool::Renamed { original, exposed }
                    if original.trim().is_empty() || exposed.trim().is_empty() =>
                {
                    return Err(SwitchboardError::Configuration(format!(
                        "exposedTools rename entry must name both sides \
                         (original '{original}', exposed '{exposed}')"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// The exposed name configured for `original`, when a rename entry exists.
    pub fn rename_for(&self, original: &str) -> Option<&str> {
        self.exposed_tools.as_deref()?.iter().find_map(|entry| match entry {
            ExposedTool::Renamed {
                original: from,
                exposed,
            } if from == original => Some(exposed.as_str()),
            _ => None,
        })
    }
}

/// One templating variable for backend launch configuration.
///
/// `expand` enables `${name}` -> `value` substitution; `unexpand` enables the
/// inverse. A variable may support one, both, or neither direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarConfig {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub expand: bool,
    #[serde(default)]
    pub unexpand: bool,
}

impl EnvVarConfig {
    /// Create a variable with both directions disabled.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expand: false,
            unexpand: false,
        }
    }

    /// Enable `${name}` -> `value` substitution.
    pub fn expanding(mut self) -> Self {
        self.expand = true;
        self
    }

    /// Enable `value` -> `${name}` substitution.
    pub fn unexpanding(mut self) -> Self {
        self.unexpand = true;
        self
    }
}
