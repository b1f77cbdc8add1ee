//! Client configuration.
//!
//! A [`ClientConfig`] holds the server URL, the database and an optional
//! default measurement. The write and query endpoints are derived from the
//! first two exactly once, when the config is built.

use std::env;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the server URL.
pub const ENV_URL: &str = "INFLUXDB_URL";
/// Environment variable holding the database name.
pub const ENV_DATABASE: &str = "INFLUXDB_DATABASE";
/// Environment variable holding the default measurement (optional).
pub const ENV_MEASUREMENT: &str = "INFLUXDB_MEASUREMENT";

/// Connection settings for one InfluxDB database.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
    server_url: String,
    database: String,
    measurement: Option<String>,
    write_endpoint: String,
    query_endpoint: String,
}

/// Serialized shape of [`ClientConfig`]; endpoints are never read from input.
#[derive(Debug, Serialize, Deserialize)]
struct RawClientConfig {
    server_url: String,
    database: String,
    #[serde(default)]
    measurement: Option<String>,
}

impl TryFrom<RawClientConfig> for ClientConfig {
    type Error = Error;

    fn try_from(raw: RawClientConfig) -> Result<Self> {
        let config = Self::new(raw.server_url, raw.database)?;
        Ok(match raw.measurement {
            Some(m) => config.with_measurement(m),
            None => config,
        })
    }
}

impl Serialize for ClientConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RawClientConfig {
            server_url: self.server_url.clone(),
            database: self.database.clone(),
            measurement: self.measurement.clone(),
        }
        .serialize(serializer)
    }
}

impl ClientConfig {
    /// Create a config for `database` on the server at `server_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `server_url` is not a valid URL and
    /// [`Error::Config`] if `database` is empty.
    pub fn new(server_url: impl Into<String>, database: impl Into<String>) -> Result<Self> {
        let server_url = server_url.into();
        let database = database.into();

        Url::parse(&server_url).map_err(|source| Error::InvalidUrl {
            url: server_url.clone(),
            source,
        })?;
        if database.trim().is_empty() {
            return Err(Error::Config("database name cannot be empty".to_string()));
        }

        let base = server_url.trim_end_matches('/');
        let write_endpoint = format!("{}/write?db={}&precision=s", base, database);
        let query_endpoint = format!("{}/query?db={}&epoch=s", base, database);

        Ok(Self {
            server_url,
            database,
            measurement: None,
            write_endpoint,
            query_endpoint,
        })
    }

    /// Set the default measurement used by multi-field writes and field queries.
    pub fn with_measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = Some(measurement.into());
        self
    }

    /// Parse a config from JSON.
    ///
    /// ```ignore
    /// let config = ClientConfig::from_json(r#"{
    ///     "server_url": "http://localhost:8086",
    ///     "database": "sensors",
    ///     "measurement": "climate"
    /// }"#)?;
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the config from `INFLUXDB_URL`, `INFLUXDB_DATABASE` and the
    /// optional `INFLUXDB_MEASUREMENT`.
    pub fn from_env() -> Result<Self> {
        let server_url = required_var(ENV_URL)?;
        let database = required_var(ENV_DATABASE)?;
        let config = Self::new(server_url, database)?;

        Ok(match env::var(ENV_MEASUREMENT) {
            Ok(m) if !m.trim().is_empty() => config.with_measurement(m),
            _ => config,
        })
    }

    /// Get the server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Get the database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Get the default measurement, if any.
    pub fn measurement(&self) -> Option<&str> {
        self.measurement.as_deref()
    }

    pub(crate) fn set_measurement(&mut self, measurement: String) {
        self.measurement = Some(measurement);
    }

    /// Full URL of the write endpoint.
    pub fn write_endpoint(&self) -> &str {
        &self.write_endpoint
    }

    /// Full URL of the query endpoint.
    pub fn query_endpoint(&self) -> &str {
        &self.query_endpoint
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name)
        .map_err(|_| Error::Config(format!("missing environment variable {}", name)))?;
    if value.trim().is_empty() {
        return Err(Error::Config(format!("environment variable {} is empty", name)));
    }
    Ok(value)
}
