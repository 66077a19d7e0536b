pub const SERVER_ADDR: &str = "127.0.0.1:8080";
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const ANY_ORIGIN: &str = "*";

pub const CHAN_CAPACITY: usize = 100;

/// Maximum inbound payload size in bytes
pub const MAX_MESSAGE_SIZE: usize = 10000;
/// Max seconds a single outbound write may take
pub const WRITE_WAIT_SECS: u64 = 10;
/// Max seconds between two inbound frames (data or pong)
pub const PONG_WAIT_SECS: u64 = 60;

/// Separates coalesced messages inside one websocket frame
pub const FRAME_DELIMITER: char = '\n';
