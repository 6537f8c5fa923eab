// Mock Octopus server shared by the integration tests. The client under test
// is blocking, so the mock server is driven from its own tokio runtime.

#![allow(dead_code)]

use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HOST: &str = "octo.test";
pub const API_KEY: &str = "API-TEST";

pub struct MockOctopus {
    // dropped before the runtime
    pub server: MockServer,
    rt: Runtime,
}

impl MockOctopus {
    pub fn start() -> Self {
        let rt = Runtime::new().expect("tokio runtime");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    /// API root to point clients at.
    pub fn base_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    /// Serve the project listing, only to requests carrying the fixed headers.
    pub fn with_projects(&self) {
        self.mount(
            Mock::given(method("GET"))
                .and(path("/api/projects/all"))
                .and(header("accept", "application/json"))
                .and(header("x-octopus-apikey", API_KEY))
                .and(header("user-agent", "actopus"))
                .and(header("host", HOST))
                .respond_with(ResponseTemplate::new(200).set_body_json(projects())),
        );
    }

    pub fn with_release_status(&self, project_id: &str, version: &str, status: u16) {
        self.mount(
            Mock::given(method("GET"))
                .and(path(format!("/api/projects/{}/releases/{}", project_id, version)))
                .respond_with(ResponseTemplate::new(status).set_body_string("release lookup")),
        );
    }
}

pub fn projects() -> Value {
    json!([
        {
            "Id": "Projects-1",
            "Name": "test-proj",
            "Slug": "test-proj",
            "SpaceId": "Spaces-1",
            "ClonedFromProjectId": null,
            "Templates": [],
            "Links": {"Self": "/api/Spaces-1/projects/Projects-1"}
        },
        {
            "Id": "Projects-42",
            "Name": "web",
            "Slug": "web",
            "SpaceId": "Spaces-1"
        }
    ])
}

pub fn created_release() -> Value {
    json!({
        "Id": "Releases-1",
        "Assembled": "2019-10-06T22:17:45.432+00:00",
        "ReleaseNotes": null,
        "ProjectId": "Projects-1",
        "ChannelId": "Channels-1",
        "SelectedPackages": [],
        "SpaceId": "Spaces-1",
        "Version": "1.0.0",
        "Links": {"Self": "/api/Spaces-1/releases/Releases-1"}
    })
}
