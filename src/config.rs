// settings
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

const DEFAULT_DATABASE: &str = "songs";
const DEFAULT_COLLECTION: &str = "songs";
const DEFAULT_SEED_FILE: &str = "data/songs.json";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing MongoDB server in the MONGODB_SERVICE variable")]
    MissingService,
    #[error("{key} must be a port number, got {value:?}")]
    InvalidPort { key: &'static str, value: String },
    #[error("{key} must be true or false, got {value:?}")]
    InvalidFlag { key: &'static str, value: String },
    #[error("MONGODB_PORT is set but MONGODB_SERVICE {0:?} is not a bare host")]
    PortConflict(String),
    #[error("invalid listen address {0}")]
    InvalidListenAddr(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_service: String,
    pub mongodb_port: Option<u16>,
    pub credentials: Option<Credentials>,
    pub database: String,
    pub collection: String,
    pub seed_file: PathBuf,
    pub seed_on_startup: bool,
    pub listen_addr: SocketAddr,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongodb_service = get("MONGODB_SERVICE").ok_or(ConfigError::MissingService)?;
        let mongodb_port = get("MONGODB_PORT")
            .map(|value| parse_port("MONGODB_PORT", value))
            .transpose()?;
        if mongodb_port.is_some() && !is_bare_host(&mongodb_service) {
            return Err(ConfigError::PortConflict(mongodb_service));
        }

        let credentials = match (get("MONGODB_USERNAME"), get("MONGODB_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        let seed_on_startup = match get("SEED_ON_STARTUP") {
            Some(value) => parse_flag("SEED_ON_STARTUP", value)?,
            None => true,
        };

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(value) => parse_port("PORT", value)?,
            None => DEFAULT_PORT,
        };
        let listen_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(format!("{}:{}", host, port)))?;

        let settings = Settings {
            mongodb_service,
            mongodb_port,
            credentials,
            database: get("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: get("MONGODB_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            seed_file: get("SEED_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_FILE)),
            seed_on_startup,
            listen_addr,
        };

        // Log which settings are configured (NOT their values!)
        let configured: Vec<&str> = [
            "MONGODB_SERVICE",
            "MONGODB_PORT",
            "MONGODB_USERNAME",
            "MONGODB_PASSWORD",
            "MONGODB_DATABASE",
            "MONGODB_COLLECTION",
            "SEED_FILE",
            "SEED_ON_STARTUP",
            "HOST",
            "PORT",
        ]
        .into_iter()
        .filter(|key| get(*key).is_some())
        .collect();
        info!("Settings configured: {:?}", configured);

        Ok(settings)
    }

    /// Host part of the connection string, with `MONGODB_PORT` applied.
    fn address(&self) -> String {
        match self.mongodb_port {
            Some(port) => format!("{}:{}", self.mongodb_service, port),
            None => self.mongodb_service.clone(),
        }
    }

    pub fn connection_uri(&self) -> String {
        match &self.credentials {
            Some(creds) => format!(
                "mongodb://{}:{}@{}",
                urlencoding::encode(&creds.username),
                urlencoding::encode(&creds.password),
                self.address()
            ),
            None => format!("mongodb://{}", self.address()),
        }
    }

    /// Connection string safe to write to logs.
    pub fn redacted_uri(&self) -> String {
        match &self.credentials {
            Some(creds) => format!(
                "mongodb://{}:****@{}",
                urlencoding::encode(&creds.username),
                self.address()
            ),
            None => format!("mongodb://{}", self.address()),
        }
    }
}

/// A single hostname, IPv4 address or bracketed IPv6 literal, with no port,
/// path, query, credentials or host list.
fn is_bare_host(service: &str) -> bool {
    if let Some(inner) = service.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return !inner.is_empty()
            && inner
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');
    }
    !service.is_empty()
        && !service
            .chars()
            .any(|c| matches!(c, ':' | '/' | '?' | ',' | '@' | '[' | ']') || c.is_whitespace())
}

fn parse_port(key: &'static str, value: String) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort { key, value })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}
