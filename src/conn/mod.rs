//! Registry of connected clients and rooms

mod room;
pub use room::Room;

mod state;
pub use state::HubStatus;

mod client;
pub use client::Client;

mod hub;
pub use hub::Hub;
