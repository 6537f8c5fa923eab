// Endpoint registry: maps a logical operation, named by `(type, action)`,
// to the HTTP shape needed to reach it on the server. The table is loaded
// once and never mutated afterwards.

use crate::error::{ActopusError, LookupFailure, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Endpoint table compiled into the binary.
const BUILTIN_ENDPOINTS: &str = include_str!("../resources/endpoints.json");

/// HTTP verbs the endpoint table may use.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// One action inside a group, as it appears in the JSON table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    pub action: String,
    pub method: HttpMethod,
    /// Path template relative to the API root, e.g. `/projects/{id}/releases`.
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
}

/// All actions available for one resource type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EndpointGroup {
    #[serde(rename = "type")]
    pub endpoint_type: String,
    pub actions: Vec<ActionDefinition>,
}

/// A fully resolved endpoint: what `EndpointRegistry::resolve` hands out.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDefinition {
    pub endpoint_type: String,
    pub action: String,
    pub method: HttpMethod,
    pub path_template: String,
    pub body_template: Option<Map<String, Value>>,
}

impl EndpointDefinition {
    /// Fill `{name}` placeholders in the path template.
    ///
    /// Placeholders without a matching parameter are left untouched.
    pub fn path(&self, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(self.path_template.clone(), |path, (name, value)| {
                path.replace(&format!("{{{}}}", name), value)
            })
    }
}

/// Read-only lookup table of endpoint definitions.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    groups: Vec<EndpointGroup>,
}

impl EndpointRegistry {
    /// Build a registry from already parsed groups.
    ///
    /// Empty type or action names are rejected since they could never be
    /// looked up.
    pub fn new(groups: Vec<EndpointGroup>) -> Result<Self> {
        for group in &groups {
            if group.endpoint_type.is_empty() {
                return Err(ActopusError::Config(
                    "endpoint group with an empty type".into(),
                ));
            }
            if let Some(bad) = group.actions.iter().find(|a| a.action.is_empty()) {
                return Err(ActopusError::Config(format!(
                    "endpoint type '{}' has an action with an empty name ({})",
                    group.endpoint_type, bad.endpoint
                )));
            }
        }
        Ok(Self { groups })
    }

    /// Parse a JSON endpoint table.
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: Vec<EndpointGroup> = serde_json::from_str(json)
            .map_err(|e| ActopusError::Config(format!("invalid endpoint table: {}", e)))?;
        Self::new(groups)
    }

    /// Load a JSON endpoint table from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The endpoint table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ENDPOINTS)
    }

    /// Look up the definition for `(endpoint_type, action)`.
    ///
    /// When the table repeats a type, the last group with that type wins,
    /// and within it the last matching action wins.
    pub fn resolve(&self, endpoint_type: &str, action: &str) -> Result<EndpointDefinition> {
        let not_found = |kind| ActopusError::EndpointNotFound {
            kind,
            endpoint_type: endpoint_type.to_string(),
            action: action.to_string(),
        };

        let group = self
            .groups
            .iter()
            .rev()
            .find(|g| g.endpoint_type == endpoint_type)
            .ok_or_else(|| not_found(LookupFailure::UnknownType))?;

        let def = group
            .actions
            .iter()
            .rev()
            .find(|a| a.action == action)
            .ok_or_else(|| not_found(LookupFailure::UnknownAction))?;

        Ok(EndpointDefinition {
            endpoint_type: group.endpoint_type.clone(),
            action: def.action.clone(),
            method: def.method,
            path_template: def.endpoint.clone(),
            body_template: def.body.clone(),
        })
    }
}
