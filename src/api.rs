// HTTP plumbing: a small blocking client that sends one request to the
// deployment server and hands back the raw status and body. Interpreting
// status codes is left to `release::ReleaseClient`.

use crate::config::{ClientConfig, USER_AGENT};
use crate::endpoints::HttpMethod;
use crate::error::{ActopusError, Result};
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, HOST, USER_AGENT as USER_AGENT_HEADER,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "x-octopus-apikey";

/// Status and body of a completed HTTP round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON. The raw body is kept in the error for
    /// diagnosis.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| ActopusError::Decode {
            status: self.status,
            body: self.body.clone(),
            source,
        })
    }
}

/// Something that can perform a request against the server's API root.
///
/// `path` is relative to the API root (e.g. `/projects/all`). Getting any
/// response back, whatever its status, is success; only a failed round trip
/// is an error.
pub trait HttpSender {
    fn send(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<HttpResponse>;
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// `HttpSender` backed by a blocking reqwest client.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl ApiClient {
    /// Build a client from `config`. Fails if the host or API key cannot be
    /// used as header values, or the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.accept_invalid_certs {
            tracing::warn!(host = %config.host, "TLS certificate validation is disabled");
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            headers: fixed_headers(config)?,
        })
    }
}

/// Headers sent with every request.
fn fixed_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let value = |name: &str, v: &str| {
        HeaderValue::from_str(v)
            .map_err(|_| ActopusError::Config(format!("invalid value for {} header", name)))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let mut key = value("API key", &config.api_key)?;
    key.set_sensitive(true);
    headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
    headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));
    headers.insert(HOST, value("Host", &config.host)?);
    Ok(headers)
}

impl HttpSender for ApiClient {
    fn send(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<HttpResponse> {
        // Endpoint paths already start with '/', base_url never ends with one.
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, has_body = body.is_some(), "sending request");

        let mut req = self
            .client
            .request(method.into(), &url)
            .headers(self.headers.clone());
        // Only attach a JSON body when the endpoint has one; GETs go out empty.
        if let Some(body) = body {
            req = req.json(body);
        }

        // A connection failure becomes `Transport`; any status is a response.
        let res = req.send()?;
        let status = res.status().as_u16();
        let text = res.text()?;
        debug!(status, bytes = text.len(), "received response");
        Ok(HttpResponse::new(status, text))
    }
}
