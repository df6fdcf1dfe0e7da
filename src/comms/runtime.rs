//! Channel runtime: the console and HTTP channels run as sibling tasks that
//! share one shutdown token.

use std::future::Future;
use std::pin::Pin;

use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::AppError;

/// A boxed, owned future returned by [`Component::run`].
pub type ComponentFuture = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'static>>;

/// A channel. `run` is called once and returns when `shutdown` is cancelled
/// or the channel has nothing left to do.
pub trait Component: Send + 'static {
    fn id(&self) -> &str;
    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture;
}

pub struct ChannelsHandle {
    inner: JoinHandle<Result<(), AppError>>,
}

impl ChannelsHandle {
    /// Wait for every channel; the first failure, if any.
    pub async fn join(self) -> Result<(), AppError> {
        match self.inner.await {
            Ok(r) => r,
            Err(e) => Err(AppError::Comms(format!("channel task panicked: {e}"))),
        }
    }
}

/// Spawn each channel as its own task.
///
/// The first channel to fail (or panic) cancels `shutdown`; the handle
/// resolves to that error once every channel has stopped.
pub fn spawn_components(components: Vec<Box<dyn Component>>, shutdown: CancellationToken) -> ChannelsHandle {
    let mut set = JoinSet::new();
    for component in components {
        debug!(channel = %component.id(), "spawning channel");
        set.spawn(component.run(shutdown.clone()));
    }

    let inner = tokio::spawn(async move {
        let mut first_err = None;
        while let Some(joined) = set.join_next().await {
            let outcome = joined.unwrap_or_else(|e| Err(AppError::Comms(format!("channel panicked: {e}"))));
            if let Err(e) = outcome {
                error!("channel stopped: {e}");
                shutdown.cancel();
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    });

    ChannelsHandle { inner }
}
