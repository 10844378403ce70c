//! Environment variable templating over configuration value trees.
//!
//! `expand_env_vars` materializes concrete launch arguments from a templated
//! configuration before a backend is spawned; `unexpand_env_vars` is the
//! inverse, used when displaying or persisting configuration so literal
//! secret values are not echoed back. Both are pure transforms over
//! `serde_json::Value` and never mutate their input.

use std::collections::HashSet;

use serde_json::Value;

use crate::config::EnvVarConfig;

/// Merge global and backend-specific templating variables.
///
/// Backend-specific definitions strictly override same-named globals;
/// ordering is otherwise global-then-backend.
pub fn combine_env_vars(
    global: &[EnvVarConfig],
    per_backend: &[EnvVarConfig],
) -> Vec<EnvVarConfig> {
    let backend_names: HashSet<&str> = per_backend.iter().map(|v| v.name.as_str()).collect();

    let mut combined: Vec<EnvVarConfig> = global
        .iter()
        .filter(|var| !backend_names.contains(var.name.as_str()))
        .cloned()
        .collect();
    combined.extend(per_backend.iter().cloned());
    combined
}

/// Replace every literal `${name}` with `value` on string leaves, for each
/// variable with `expand` enabled, in list order.
pub fn expand_env_vars(tree: &Value, configs: &[EnvVarConfig]) -> Value {
    map_string_leaves(tree, &|text| {
        let mut result = text.to_owned();
        for config in configs {
            if config.expand {
                result = result.replace(&placeholder(&config.name), &config.value);
            }
        }
        result
    })
}

/// Replace every literal occurrence of `value` with `${name}` on string
/// leaves, for each variable with `unexpand` enabled, in list order.
pub fn unexpand_env_vars(tree: &Value, configs: &[EnvVarConfig]) -> Value {
    map_string_leaves(tree, &|text| {
        let mut result = text.to_owned();
        for config in configs {
            if config.unexpand && !config.value.is_empty() {
                result = result.replace(&config.value, &placeholder(&config.name));
            }
        }
        result
    })
}

fn placeholder(name: &str) -> String {
    format!("${{{name}}}")
}

/// Structure-preserving walk; only string leaves are rewritten.
fn map_string_leaves(tree: &Value, rewrite: &dyn Fn(&str) -> String) -> Value {
    match tree {
        Value::String(text) => Value::String(rewrite(text)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| map_string_leaves(item, rewrite))
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), map_string_leaves(value, rewrite)))
                .collect(),
        ),
        other => other.clone(),
    }
}
