//! # influxql-client
//!
//! Small async client for InfluxDB 1.x: write samples as line protocol, read
//! them back with InfluxQL `mean` and `last` queries.
//!
//! ## Quick Start
//!
//! ```ignore
//! use influxql_client::{Client, DataPoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::new("http://localhost:8086", "home")?;
//!     client.set_tag("room", "keller");
//!
//!     // temperature,room=keller value=15.5
//!     client.write_value("temperature", 15.5).await?;
//!
//!     // temperature,room=keller value=15.5
//!     // humidity,room=keller value=61
//!     client
//!         .write_points(&[
//!             DataPoint::new("temperature", 15.5),
//!             DataPoint::new("humidity", 61.0),
//!         ])
//!         .await?;
//!
//!     let last = client.query_last("temperature").await?;
//!     let mean = client.query_mean("temperature", 30).await?;
//!     println!("last {} / 30 min mean {}", last.value, mean.value);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Wire formats
//!
//! - **Writes** go to `<server>/write?db=<db>&precision=s` as line protocol.
//!   Names are not escaped; keep commas, spaces and `=` out of them.
//! - **Queries** go to `<server>/query?db=<db>&epoch=s` with
//!   `Accept: application/csv`. The single data row of the answer is decoded
//!   by column number, see [`CsvResponseDecoder`].
//!
//! ## Errors
//!
//! Every operation returns a [`Result`]. A non-success status, an empty result
//! or a missing column are all reported as [`Error`] variants; the client is
//! never left in a broken state.

pub mod client;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use client::Client;
pub use config::ClientConfig;
pub use decoder::{CsvResponseDecoder, extract_field};
pub use encoder::LineProtocolEncoder;
pub use error::{Error, Result};
pub use query::{Aggregate, Statement};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
pub use types::{DataPoint, Tag};
