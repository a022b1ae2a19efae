//! Server configuration parsed from environment variables.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://127.0.0.1:4173",
    "http://localhost:4173",
    "http://127.0.0.1:5173",
    "http://localhost:5173",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub allowed_origins: Vec<String>,
    pub seed_sample_data: bool,
}

impl Config {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `DATABASE_URL`: Postgres URL; in-memory store when absent or empty
    /// - `HOST`: default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `ALLOWED_ORIGINS`: comma-separated CORS origins; local dev origins
    ///   when unset, none when set but empty
    /// - `SEED_SAMPLE_DATA`: `1`/`true`/`yes`/`on` to seed the catalog
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric or boolean value does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned());
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let db_max_connections = env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let allowed_origins = parse_allowed_origins(std::env::var("ALLOWED_ORIGINS").ok().as_deref());
        let seed_sample_data = match std::env::var("SEED_SAMPLE_DATA") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { key: "SEED_SAMPLE_DATA", value: raw })?,
            Err(_) => false,
        };

        Ok(Self { database_url, host, port, db_max_connections, allowed_origins, seed_sample_data })
    }
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_allowed_origins(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return DEFAULT_ALLOWED_ORIGINS.iter().map(|o| (*o).to_owned()).collect();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
