use crate::device_client::CommandOutcome;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url, redirect};

/// Query parameters never written to the log in clear text
const REDACTED_PARAMS: &[&str] = &["password"];

/// Create the HTTP client used for all device commands
///
/// The client owns the connection pool; build it once per process and share
/// it by cloning. Timeouts are left at the transport defaults. Redirects are
/// not followed: the outcome is decided by the device's own status.
pub fn device_http_client() -> Result<Client> {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .context("failed to create device HTTP client")
}

/// Map a device response status to a command outcome
///
/// Any 2xx is a success, everything else is a rejection carrying the raw
/// numeric status.
pub fn outcome_from_status(status: StatusCode) -> CommandOutcome {
    if status.is_success() {
        CommandOutcome::Success
    } else {
        CommandOutcome::Rejected(status.as_u16().to_string())
    }
}

/// Map a transport failure to a command outcome
///
/// The URL is stripped from the error first since it carries the operator
/// supplied credentials.
pub fn outcome_from_error(error: reqwest::Error) -> CommandOutcome {
    let cause = anyhow::Error::from(error.without_url());
    CommandOutcome::Unreachable(format!("{cause:#}"))
}

/// Render a request URL for logging with sensitive query values masked
pub fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if REDACTED_PARAMS.contains(&&*key) {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
