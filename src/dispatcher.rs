//! Device command dispatcher
//!
//! Sends commands to the device without blocking the caller. Each call to
//! [`DeviceCommandDispatcher::dispatch`] makes exactly one attempt and yields
//! exactly one [`CommandOutcome`]; nothing is retried or deduplicated.

use crate::device_client::{CommandOutcome, CommandRequest, DeviceClient};
use anyhow::{Context, Result};
use log::debug;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context as TaskContext, Poll},
};
use tokio::{runtime::Handle, sync::oneshot};

/// Handle to the outcome of a dispatched command
///
/// Resolves once. Dropping it does not cancel the request.
#[must_use = "the outcome is lost if the handle is dropped"]
pub struct PendingOutcome {
    rx: oneshot::Receiver<CommandOutcome>,
}

impl Future for PendingOutcome {
    type Output = CommandOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| {
            res.unwrap_or_else(|_| {
                CommandOutcome::Unreachable("dispatch task ended without an outcome".to_string())
            })
        })
    }
}

pub struct DeviceCommandDispatcher<C> {
    client: Arc<C>,
    runtime: Handle,
}

impl<C> Clone for DeviceCommandDispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            runtime: self.runtime.clone(),
        }
    }
}

impl<C> DeviceCommandDispatcher<C>
where
    C: DeviceClient + Send + Sync + 'static,
{
    /// Create a dispatcher spawning onto the current tokio runtime
    pub fn new(client: C) -> Result<Self> {
        let runtime =
            Handle::try_current().context("failed to find tokio runtime for device commands")?;

        Ok(Self::with_runtime(client, runtime))
    }

    pub fn with_runtime(client: C, runtime: Handle) -> Self {
        Self {
            client: Arc::new(client),
            runtime,
        }
    }

    /// Send a command in the background and return immediately
    ///
    /// # Returns
    /// A [`PendingOutcome`] resolving to `Success` on a 2xx answer, `Rejected`
    /// with the raw status otherwise, or `Unreachable` on transport failure.
    pub fn dispatch(&self, request: CommandRequest) -> PendingOutcome {
        debug!("dispatch() called for {}", request.path);

        let (tx, rx) = oneshot::channel();
        let client = Arc::clone(&self.client);

        self.runtime.spawn(async move {
            let outcome = client.send(&request).await;

            if tx.send(outcome).is_err() {
                debug!("outcome of {} dropped by caller", request.path);
            }
        });

        PendingOutcome { rx }
    }
}
