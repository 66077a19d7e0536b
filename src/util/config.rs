use crate::core::{constant, Error};
use std::{env, str::FromStr, time::Duration};

// ========================// Config //======================== //

/// Configure of the App
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub allowed_origins: Vec<String>,
    pub max_message_size: usize,
    pub write_wait: Duration,
    pub pong_wait: Duration,
    pub ping_period: Duration,
    pub client_channel_capacity: usize,
    pub room_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        let pong_wait = Duration::from_secs(constant::PONG_WAIT_SECS);
        Self {
            server_addr: constant::SERVER_ADDR.to_owned(),
            allowed_origins: vec![constant::ALLOWED_ORIGIN.to_owned()],
            max_message_size: constant::MAX_MESSAGE_SIZE,
            write_wait: Duration::from_secs(constant::WRITE_WAIT_SECS),
            pong_wait,
            ping_period: ping_period(pong_wait),
            client_channel_capacity: constant::CHAN_CAPACITY,
            room_channel_capacity: constant::CHAN_CAPACITY,
        }
    }
}

impl Config {
    /// Initialize the Config from env
    pub fn from_env() -> Result<Config, Error> {
        let server_addr = env::var("SERVER_ADDR").unwrap_or(constant::SERVER_ADDR.to_owned());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or(constant::ALLOWED_ORIGIN.to_owned())
            .split(',')
            .map(|origin| origin.trim().to_owned())
            .filter(|origin| !origin.is_empty())
            .collect();

        let max_message_size = parse_env("MAX_MESSAGE_SIZE", constant::MAX_MESSAGE_SIZE)?;
        let write_wait = parse_env("WRITE_WAIT_SECS", constant::WRITE_WAIT_SECS)?;
        let pong_wait = parse_env("PONG_WAIT_SECS", constant::PONG_WAIT_SECS)?;
        let client_channel_capacity = parse_env("CLIENT_CHANNEL_CAPACITY", constant::CHAN_CAPACITY)?;
        let room_channel_capacity = parse_env("ROOM_CHANNEL_CAPACITY", constant::CHAN_CAPACITY)?;

        let pong_wait = Duration::from_secs(pong_wait);
        let config = Config {
            server_addr,
            allowed_origins,
            max_message_size,
            write_wait: Duration::from_secs(write_wait),
            pong_wait,
            ping_period: ping_period(pong_wait),
            client_channel_capacity,
            room_channel_capacity,
        };
        config.check()?;
        Ok(config)
    }

    /// Whether an upgrade request from `origin` may be accepted
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allowed_origins
            .iter()
            .any(|allowed| allowed == constant::ANY_ORIGIN || allowed == origin)
    }

    fn check(&self) -> Result<(), Error> {
        if self.ping_period.is_zero() || self.ping_period >= self.pong_wait {
            return Err(Error::Config(
                "ping period must be shorter than PONG_WAIT_SECS".to_owned(),
            ));
        }
        if self.client_channel_capacity == 0 || self.room_channel_capacity == 0 {
            return Err(Error::Config("channel capacity must be positive".to_owned()));
        }
        Ok(())
    }
}

/// Send pings at 9/10 of the pong deadline
fn ping_period(pong_wait: Duration) -> Duration {
    pong_wait * 9 / 10
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, Error> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("failed to parse {}", key))),
        Err(_) => Ok(default),
    }
}

// ========================// tests //======================== //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings() {
        let config = Config::default();
        assert_eq!(config.pong_wait, Duration::from_secs(60));
        assert_eq!(config.ping_period, Duration::from_secs(54));
        assert_eq!(config.write_wait, Duration::from_secs(10));
        assert_eq!(config.max_message_size, 10000);
        assert!(config.check().is_ok());
    }

    #[test]
    fn origin_allow_list() {
        let mut config = Config::default();
        assert!(config.allows_origin("http://localhost:3000"));
        assert!(!config.allows_origin("http://evil.example"));

        config.allowed_origins = vec!["*".to_owned()];
        assert!(config.allows_origin("http://evil.example"));
    }

    #[test]
    fn zero_pong_wait_is_rejected() {
        let mut config = Config::default();
        config.pong_wait = Duration::ZERO;
        config.ping_period = ping_period(config.pong_wait);
        assert!(matches!(config.check(), Err(Error::Config(_))));
    }

    #[test]
    fn parse_env_values() {
        env::set_var("CHAT_RELAY_TEST_CAPACITY", "42");
        env::set_var("CHAT_RELAY_TEST_BROKEN", "many");

        let value: usize = parse_env("CHAT_RELAY_TEST_CAPACITY", 1).expect("failed to parse");
        assert_eq!(value, 42);

        let value: usize = parse_env("CHAT_RELAY_TEST_MISSING", 7).expect("failed to parse");
        assert_eq!(value, 7);

        let result: Result<usize, Error> = parse_env("CHAT_RELAY_TEST_BROKEN", 1);
        assert!(result.is_err());
    }
}
