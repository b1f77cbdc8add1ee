//! InfluxDB 1.x client.
//!
//! This module provides the main `Client` type for writing line protocol to
//! and reading `mean`/`last` values from an InfluxDB 1.x server.

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::decoder::CsvResponseDecoder;
use crate::encoder::LineProtocolEncoder;
use crate::error::{Error, Result};
use crate::query::Statement;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
use crate::types::{DataPoint, Tag};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const CSV_ACCEPT: &str = "application/csv";

/// Status InfluxDB answers a successful write with.
pub const WRITE_SUCCESS: u16 = 204;
/// Status InfluxDB answers a successful query with.
pub const QUERY_SUCCESS: u16 = 200;

// Responses look like `name,tags,time,<aggregate>`.
const TIME_FIELD: usize = 3;
const VALUE_FIELD: usize = 4;

/// InfluxDB 1.x client.
///
/// Every write and query issues exactly one `POST` and resolves once the
/// response is in. Nothing is retried. A failed call leaves the client
/// untouched and ready for the next one.
///
/// The tag set with [`Client::set_tag`] is applied to every following write
/// and used as the filter of every following query. Setters take `&mut self`,
/// so they cannot race with calls in flight.
///
/// # Example
///
/// ```ignore
/// use influxql_client::{Client, DataPoint};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = Client::new("http://localhost:8086", "home")?;
///     client.set_tag("room", "keller");
///
///     client.write_value("temperature", 15.5).await?;
///
///     let last = client.query_last("temperature").await?;
///     println!("{} = {} at {:?}", last.name, last.value, last.timestamp);
///
///     let mean = client.query_mean("temperature", 60).await?;
///     println!("hourly mean: {}", mean.value);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
    tag: Tag,
}

impl Client<HttpTransport> {
    /// Create a new client for `database` on the server at `server_url`.
    ///
    /// # Arguments
    ///
    /// * `server_url` - Base URL of the InfluxDB server (e.g., "http://localhost:8086")
    /// * `database` - Database name
    pub fn new(server_url: impl Into<String>, database: impl Into<String>) -> Result<Self> {
        Ok(Self::from_config(ClientConfig::new(server_url, database)?))
    }

    /// Create a new client from a prepared config.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_transport(HttpTransport::new(), config)
    }
}

impl<T: Transport> Client<T> {
    /// Create a new client that sends its requests through `transport`.
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            tag: Tag::default(),
        }
    }

    /// Get the config.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the tag applied to writes and queries.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replace the tag used by subsequent writes and queries.
    ///
    /// The default is `tag=somevalue`.
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tag = Tag::new(key, value);
    }

    /// Replace the default measurement used by [`Client::write_fields`] and
    /// [`Client::query_last_field`].
    pub fn set_measurement(&mut self, measurement: impl Into<String>) {
        self.config.set_measurement(measurement.into());
    }

    /// Write one value: `measurement,<tag> value=<value>`.
    pub async fn write_value(&self, measurement: &str, value: f64) -> Result<()> {
        let line = LineProtocolEncoder::encode_value(measurement, &self.tag, value);
        self.write(line).await
    }

    /// Write several fields of the default measurement as one line:
    /// `measurement,<tag> f1=v1,f2=v2`.
    ///
    /// Each point's name is used as the field name. The first point's
    /// timestamp, if any, becomes the line's timestamp.
    /// Nothing is sent for an empty slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMeasurement`] if no default measurement is configured.
    pub async fn write_fields(&self, fields: &[DataPoint]) -> Result<()> {
        let measurement = self.config.measurement().ok_or(Error::MissingMeasurement)?;
        if fields.is_empty() {
            debug!("No fields to write to {}", measurement);
            return Ok(());
        }

        let line = LineProtocolEncoder::encode_fields(measurement, &self.tag, fields);
        self.write(line).await
    }

    /// Write one line per point in a single request.
    ///
    /// Each point's name is used as the measurement. Nothing is sent for an
    /// empty slice.
    pub async fn write_points(&self, points: &[DataPoint]) -> Result<()> {
        if points.is_empty() {
            debug!("No points to write");
            return Ok(());
        }

        let payload = LineProtocolEncoder::encode_points(points, &self.tag);
        self.write(payload).await
    }

    /// Get the mean of `measurement` over the last `minutes` minutes.
    ///
    /// The returned point is named after the measurement; its timestamp is the
    /// start of the window as reported by the server.
    pub async fn query_mean(&self, measurement: &str, minutes: u32) -> Result<DataPoint> {
        let statement = Statement::mean(measurement, minutes, &self.tag);
        self.read(&statement, measurement).await
    }

    /// Get the most recent value of `measurement`.
    pub async fn query_last(&self, measurement: &str) -> Result<DataPoint> {
        let statement = Statement::last("value", measurement, &self.tag);
        self.read(&statement, measurement).await
    }

    /// Get the most recent value of `field` in the default measurement.
    ///
    /// The returned point is named after the field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMeasurement`] if no default measurement is configured.
    pub async fn query_last_field(&self, field: &str) -> Result<DataPoint> {
        let measurement = self.config.measurement().ok_or(Error::MissingMeasurement)?;
        let statement = Statement::last(field, measurement, &self.tag);
        self.read(&statement, field).await
    }

    /// Send a line protocol payload to the write endpoint.
    async fn write(&self, payload: String) -> Result<()> {
        let endpoint = self.config.write_endpoint();
        debug!("Writing {} bytes of line protocol to {}", payload.len(), endpoint);

        let request =
            HttpRequest::new(endpoint, payload).header("Content-Type", FORM_CONTENT_TYPE);
        let response = self.send(request).await?;

        if response.status != WRITE_SUCCESS {
            warn!(
                "Error while writing values to server - HTTP-Code: {}",
                response.status
            );
            return Err(Error::UnexpectedStatus {
                expected: WRITE_SUCCESS,
                actual: response.status,
                body: response.body,
            });
        }

        debug!("HTTP response code (writing data): {}", response.status);
        Ok(())
    }

    /// Run a statement against the query endpoint and decode the single data row.
    async fn read(&self, statement: &Statement, name: &str) -> Result<DataPoint> {
        let endpoint = self.config.query_endpoint();
        debug!("Querying {}: {}", endpoint, statement);

        let request = HttpRequest::new(endpoint, statement.form_body())
            .header("Content-Type", FORM_CONTENT_TYPE)
            .header("Accept", CSV_ACCEPT);
        let response = self.send(request).await?;

        if response.status != QUERY_SUCCESS {
            warn!(
                "Error while getting values from server - HTTP-Code: {}",
                response.status
            );
            return Err(Error::UnexpectedStatus {
                expected: QUERY_SUCCESS,
                actual: response.status,
                body: response.body,
            });
        }

        debug!("HTTP response code (reading data): {}", response.status);
        decode_point(&response.body, name).inspect_err(|e| match e {
            Error::EmptyResult => warn!("No values in response to: {}", statement),
            _ => warn!("Failed to decode response to {}: {}", statement, e),
        })
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.post(request).await.inspect_err(|e| {
            warn!("HTTP request failed: {}", e);
        })
    }
}

fn decode_point(body: &str, name: &str) -> Result<DataPoint> {
    let decoder = CsvResponseDecoder::new(body);
    let timestamp = decoder.timestamp(TIME_FIELD)?;
    let value = decoder.float(VALUE_FIELD)?;

    Ok(DataPoint::new(name, value).with_timestamp(timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use tracing_test::traced_test;

    struct FixedTransport(HttpResponse);

    impl Transport for FixedTransport {
        fn post(&self, _request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
            let response = self.0.clone();
            async move { Ok(response) }.boxed()
        }
    }

    fn client(status: u16, body: &str) -> Client<FixedTransport> {
        let config = ClientConfig::new("http://localhost:8086", "home").unwrap();
        Client::with_transport(FixedTransport(HttpResponse::new(status, body)), config)
    }

    #[test]
    fn test_decode_point() {
        let point = decode_point("name,tags,time,mean\ntemperature,,1588053087,15.5", "temperature")
            .unwrap();
        assert_eq!(point.name, "temperature");
        assert_eq!(point.value, 15.5);
        assert_eq!(point.epoch_seconds(), Some(1588053087));
    }

    #[test]
    fn test_decode_point_missing_value_column() {
        let err = decode_point("name,tags,time\ntemperature,,1588053087", "temperature")
            .unwrap_err();
        assert!(matches!(err, Error::FieldOutOfRange { field: 4, available: 3 }));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_write_status_is_logged() {
        let client = client(500, "internal error");
        let err = client.write_value("temperature", 1.0).await.unwrap_err();

        assert!(matches!(
            err,
            Error::UnexpectedStatus {
                expected: 204,
                actual: 500,
                ..
            }
        ));
        assert!(logs_contain("Error while writing values to server - HTTP-Code: 500"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_result_is_logged() {
        let client = client(200, "");
        let err = client.query_last("temperature").await.unwrap_err();

        assert!(matches!(err, Error::EmptyResult));
        assert!(logs_contain("No values in response"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_malformed_response_is_logged() {
        let client = client(200, "name,tags,time\ntemperature,,1588053087");
        let err = client.query_last("temperature").await.unwrap_err();

        assert!(matches!(err, Error::FieldOutOfRange { field: 4, .. }));
        assert!(logs_contain(
            "Failed to decode response to SELECT last(value) FROM temperature"
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unparsable_value_is_logged() {
        let client = client(200, "name,tags,time,last\ntemperature,,1588053087,warm");
        let err = client.query_last("temperature").await.unwrap_err();

        assert!(matches!(err, Error::Parse { .. }));
        assert!(logs_contain("Invalid float 'warm'"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_successful_write_is_logged() {
        let client = client(204, "");
        client.write_value("temperature", 1.0).await.unwrap();

        assert!(logs_contain("HTTP response code (writing data): 204"));
    }
}
