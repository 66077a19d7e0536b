mod event;
mod extractor;
mod router;
mod status;
mod websocket;

pub use router::make_app;
pub use websocket::{read_pump, serve_client, write_pump};

use crate::{conn::Hub, Config};
use std::sync::Arc;

// ========================// AppState //======================== //

/// State shared by every handler and pump
pub struct AppState {
    pub config: Config,
    pub hub: Hub,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let hub = Hub::new(config.room_channel_capacity);
        Arc::new(Self { config, hub })
    }
}
