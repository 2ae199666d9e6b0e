//! HTTP transport for the remote index
//!
//! Each command is a `POST {endpoint}/invoke/{command}` carrying the JSON
//! argument object as body; the JSON response body is the command result.

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{RemoteCallError, Transport};

/// Default address of a locally running index
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:7878";

/// [`Transport`] that reaches the index over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the given base URL
    ///
    /// # Errors
    ///
    /// Returns `RemoteCallError::Transport` if the endpoint is not a valid base URL.
    pub fn new(endpoint: &str) -> Result<Self, RemoteCallError> {
        let mut endpoint = Url::parse(endpoint)
            .map_err(|e| RemoteCallError::Transport(format!("invalid endpoint {endpoint}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(RemoteCallError::Transport(format!(
                "endpoint cannot be a base URL: {endpoint}"
            )));
        }
        // Url::join replaces the last segment unless the base ends with '/'
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    /// URL a command is posted to
    ///
    /// # Errors
    ///
    /// Returns `RemoteCallError::Transport` if the command name does not form a valid path.
    pub fn command_url(&self, command: &str) -> Result<Url, RemoteCallError> {
        self.endpoint
            .join(&format!("invoke/{command}"))
            .map_err(|e| RemoteCallError::Transport(format!("invalid command {command}: {e}")))
    }
}

impl Transport for HttpTransport {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, RemoteCallError> {
        let url = self.command_url(command)?;
        debug!(%url, "posting command");

        let response = self
            .client
            .post(url)
            .json(&args)
            .send()
            .await
            .map_err(|e| RemoteCallError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteCallError::Remote(format!("{status}: {body}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteCallError::Transport(e.to_string()))?;
        decode_body(command, &body)
    }
}

/// Decode a success body; an empty body is a `null` reply
fn decode_body(command: &str, body: &[u8]) -> Result<Value, RemoteCallError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| RemoteCallError::Decode {
        command: command.to_string(),
        reason: e.to_string(),
    })
}
