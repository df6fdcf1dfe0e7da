//! Comms — the channels users reach EcoBot through.
//!
//! Each channel implements [`runtime::Component`] and is spawned as an
//! independent task by [`start`]. Channels capture the shared
//! [`Arc<AppState>`] at construction time.

pub mod console;
pub mod runtime;
mod state;

#[cfg(feature = "channel-axum")]
pub mod axum_channel;

pub use state::AppState;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use runtime::{ChannelsHandle, Component, spawn_components};

/// Spawn all configured channels.
///
/// Returns immediately; the handle resolves when every channel has exited.
/// With no channel enabled the handle resolves at once and the caller waits
/// on `shutdown` alone.
pub fn start(config: &Config, state: Arc<AppState>, shutdown: CancellationToken) -> ChannelsHandle {
    let mut components: Vec<Box<dyn Component>> = Vec::new();

    #[cfg(feature = "channel-console")]
    {
        if config.comms.console.enabled {
            info!("loading console channel");
            components.push(Box::new(console::ConsoleChannel::new("console0", state.clone())));
        }
    }

    #[cfg(feature = "channel-axum")]
    {
        if config.comms.http.enabled {
            info!(bind = %config.comms.http.bind, "loading http channel");
            components.push(Box::new(axum_channel::AxumChannel::new(
                "http0",
                config.comms.http.bind.clone(),
                state.clone(),
            )));
        }
    }

    if components.is_empty() {
        info!("no channels configured");
    }

    spawn_components(components, shutdown)
}
