mod api;
mod conn;
mod core;
mod util;

pub use crate::core::Error;
pub use api::{make_app, read_pump, serve_client, write_pump, AppState};
pub use conn::{Client, Hub, HubStatus, Room};
pub use util::config::Config;
