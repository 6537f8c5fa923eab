// Library root
// ------------
// Client for creating and querying releases on an Octopus Deploy server.
// The `actopus` binary (`main.rs`) is a thin shell over these modules.
//
// Module responsibilities:
// - `endpoints`: the registry mapping `(type, action)` to HTTP method, path
//   template and body template.
// - `api`: the `HttpSender` seam and its blocking reqwest implementation.
// - `release`: project lookup and release get/create on top of the two.
// - `config`: connection settings and the optional `~/.actopus.json`.
// - `cli` / `ui`: argument parsing and the terminal flow for the binary.
pub mod api;
pub mod cli;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod release;
pub mod ui;

pub use api::{ApiClient, HttpResponse, HttpSender};
pub use config::{ClientConfig, Settings};
pub use endpoints::{EndpointDefinition, EndpointRegistry, HttpMethod};
pub use error::{ActopusError, LookupFailure, Result};
pub use release::{channel_id_for, ReleaseClient};
