use services::services::scrollrack::{ConfigError, ScrollrackConfig};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub scrollrack: ScrollrackConfig,
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and the `SCROLLRACK_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            port,
            scrollrack: ScrollrackConfig::from_env()?,
        })
    }
}
