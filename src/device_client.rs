use crate::{
    error::OperatorError,
    http_client::{outcome_from_error, outcome_from_status, redact_url},
};
use anyhow::{Context, Result};
use log::{info, warn};
#[cfg(feature = "mock")]
use mockall::automock;
use reqwest::{Client, Url};
use std::collections::BTreeMap;
use trait_variant::make;

/// A single command for the device's embedded HTTP listener
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRequest {
    pub target_base_address: String,
    pub path: String,
    pub parameters: BTreeMap<String, String>,
}

/// Result of exactly one dispatched command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Device answered with a non-2xx status, carried verbatim
    Rejected(String),
    /// Device could not be reached, carries the transport error description
    Unreachable(String),
}

impl CommandRequest {
    pub const ADD_USER_ENDPOINT: &str = "/add_user";

    pub fn new(
        target_base_address: impl Into<String>,
        path: impl Into<String>,
        parameters: BTreeMap<String, String>,
    ) -> Self {
        Self {
            target_base_address: target_base_address.into(),
            path: path.into(),
            parameters,
        }
    }

    /// Provision a user on the device
    ///
    /// The password is sent as a plain query parameter. Over `http://` it is
    /// readable by anyone on the device's network.
    pub fn add_user(target_base_address: &str, email: &str, password: &str) -> Self {
        let parameters = BTreeMap::from([
            ("email".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ]);

        Self::new(target_base_address, Self::ADD_USER_ENDPOINT, parameters)
    }

    /// Build the GET URL: base address, path, then URL-encoded parameters
    pub fn url(&self) -> Result<Url> {
        let base = self.target_base_address.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');

        let mut url = Url::parse(&format!("{base}/{path}"))
            .with_context(|| format!("failed to build url for {}", self.path))?;

        if !self.parameters.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.parameters);
        }

        Ok(url)
    }
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }

    pub fn into_result(self) -> Result<(), OperatorError> {
        match self {
            CommandOutcome::Success => Ok(()),
            CommandOutcome::Rejected(status) => Err(OperatorError::DeviceRejected(status)),
            CommandOutcome::Unreachable(cause) => Err(OperatorError::DeviceUnreachable(cause)),
        }
    }
}

/// Transport towards the device
///
/// One call is one attempt: implementations must not retry, since the device
/// side gives no idempotency guarantees.
#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait DeviceClient {
    async fn send(&self, request: &CommandRequest) -> CommandOutcome;
}

/// HTTP client for the ESP32 command listener
#[derive(Clone)]
pub struct Esp32Client {
    client: Client,
}

impl Esp32Client {
    pub fn new(client: Client) -> Self {
        Esp32Client { client }
    }
}

impl DeviceClient for Esp32Client {
    async fn send(&self, request: &CommandRequest) -> CommandOutcome {
        let url = match request.url() {
            Ok(url) => url,
            Err(e) => {
                warn!("{} not sent: {e:#}", request.path);
                return CommandOutcome::Unreachable(format!("{e:#}"));
            }
        };
        let log_url = redact_url(&url);
        info!("GET {log_url}");

        let outcome = match self.client.get(url).send().await {
            Ok(res) => outcome_from_status(res.status()),
            Err(e) => outcome_from_error(e),
        };

        match &outcome {
            CommandOutcome::Success => info!("GET {log_url} succeeded"),
            CommandOutcome::Rejected(status) => warn!("GET {log_url} rejected with status {status}"),
            CommandOutcome::Unreachable(cause) => warn!("GET {log_url} failed: {cause}"),
        }

        outcome
    }
}
