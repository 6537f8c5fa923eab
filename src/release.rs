// Release management on top of the endpoint registry and an `HttpSender`:
// project lookup by name, release existence checks and release creation.

use crate::api::{ApiClient, HttpSender};
use crate::endpoints::EndpointRegistry;
use crate::error::{ActopusError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Step name every created release selects its package version for.
pub const DEPLOY_ACTION: &str = "deploy_package";

/// A project record as returned by the project listing. Only the fields we
/// need; everything else the server sends is ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Package version pinned for one deployment step of a release.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SelectedPackage {
    pub action_name: String,
    pub version: String,
}

/// Derive a project's default channel id from its id: the part after the
/// first `-` is kept, so `Projects-42` becomes `Channels-42`.
pub fn channel_id_for(project_id: &str) -> Result<String> {
    match project_id.split_once('-') {
        Some((_, suffix)) if !suffix.is_empty() => Ok(format!("Channels-{}", suffix)),
        _ => Err(ActopusError::InvalidProjectId(project_id.to_string())),
    }
}

/// Client for the release operations.
pub struct ReleaseClient<S = ApiClient> {
    sender: S,
    registry: EndpointRegistry,
}

impl<S: HttpSender> ReleaseClient<S> {
    pub fn new(sender: S, registry: EndpointRegistry) -> Self {
        Self { sender, registry }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Return the id of the first project named exactly `name`, or `None`.
    pub fn find_project_id_by_name(&self, name: &str) -> Result<Option<String>> {
        let endpoint = self.registry.resolve("projects", "list")?;
        let res = self
            .sender
            .send(endpoint.method, &endpoint.path(&[]), None)?;
        // Parsed whatever the status; an error page fails as `Decode`
        // carrying the status and the server's message.
        let projects: Vec<Project> = res.json()?;

        let id = projects.into_iter().find(|p| p.name == name).map(|p| p.id);
        debug!(project = name, id = ?id, "project lookup");
        Ok(id)
    }

    /// Whether `version` already exists for the project called `name`.
    pub fn release_exists(&self, name: &str, version: &str) -> Result<bool> {
        let project_id = self.require_project_id(name)?;
        self.release_exists_for(&project_id, version)
    }

    /// Create release `version` for the project called `name` and return the
    /// server's record of it.
    ///
    /// Fails with `ResourceNotFound` for an unknown project before anything
    /// else is checked, and with `ResourceAlreadyExists` without attempting
    /// the create when the version is already there.
    pub fn create_release(&self, name: &str, version: &str) -> Result<Value> {
        let project_id = self.require_project_id(name)?;
        if self.release_exists_for(&project_id, version)? {
            return Err(ActopusError::ResourceAlreadyExists(version.to_string()));
        }

        let endpoint = self.registry.resolve("releases", "create")?;
        let body = release_body(
            endpoint.body_template.clone().unwrap_or_default(),
            &project_id,
            version,
        )?;

        let res = self
            .sender
            .send(endpoint.method, &endpoint.path(&[]), Some(&body))?;
        if res.status != 201 {
            return Err(ActopusError::ResourceCreationError {
                status: res.status,
                body: res.body,
            });
        }

        info!(project = name, version, "release created");
        res.json()
    }

    fn require_project_id(&self, name: &str) -> Result<String> {
        self.find_project_id_by_name(name)?
            .ok_or_else(|| ActopusError::ResourceNotFound(name.to_string()))
    }

    fn release_exists_for(&self, project_id: &str, version: &str) -> Result<bool> {
        let endpoint = self.registry.resolve("releases", "get")?;
        let path = endpoint.path(&[("id", project_id), ("version", version)]);
        let res = self.sender.send(endpoint.method, &path, None)?;

        match res.status {
            404 => Ok(false),
            200 => Ok(true),
            status => Err(ActopusError::UnexpectedResponse {
                status,
                body: res.body,
            }),
        }
    }
}

/// Fill the create-release body template for one project and version.
fn release_body(mut body: Map<String, Value>, project_id: &str, version: &str) -> Result<Value> {
    body.insert("ProjectId".into(), Value::String(project_id.to_string()));
    body.insert("ChannelId".into(), Value::String(channel_id_for(project_id)?));
    body.insert("Version".into(), Value::String(version.to_string()));

    let package = serde_json::to_value(SelectedPackage {
        action_name: DEPLOY_ACTION.to_string(),
        version: version.to_string(),
    })
    .map_err(|e| ActopusError::Config(e.to_string()))?;

    match body
        .entry("SelectedPackages")
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(packages) => packages.push(package),
        _ => {
            return Err(ActopusError::Config(
                "release body template has a non-list SelectedPackages".into(),
            ))
        }
    }

    Ok(Value::Object(body))
}
