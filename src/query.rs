//! InfluxQL statements for the supported read queries.
//!
//! Only two shapes exist:
//!
//! ```text
//! SELECT mean(value) FROM <measurement> WHERE time > now() - <minutes>m AND <key>='<value>'
//! SELECT last(<field>) FROM <measurement> WHERE <key>='<value>'
//! ```

use std::fmt;

use crate::types::Tag;

/// Aggregation applied to the selected field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregate {
    /// Mean over a trailing time window.
    Mean {
        /// Window length in minutes.
        minutes: u32,
    },
    /// Most recent value.
    Last,
}

/// A single-row InfluxQL `SELECT` filtered by one tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    aggregate: Aggregate,
    field: String,
    measurement: String,
    tag: Tag,
}

impl Statement {
    /// `SELECT mean(value)` over the last `minutes` minutes.
    pub fn mean(measurement: impl Into<String>, minutes: u32, tag: &Tag) -> Self {
        Self {
            aggregate: Aggregate::Mean { minutes },
            field: "value".to_string(),
            measurement: measurement.into(),
            tag: tag.clone(),
        }
    }

    /// `SELECT last(<field>)`.
    pub fn last(field: impl Into<String>, measurement: impl Into<String>, tag: &Tag) -> Self {
        Self {
            aggregate: Aggregate::Last,
            field: field.into(),
            measurement: measurement.into(),
            tag: tag.clone(),
        }
    }

    /// The aggregation of this statement.
    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    /// The measurement queried.
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Request body for the query endpoint: `q=<statement>`, form-encoded.
    pub fn form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", &self.to_string())
            .finish()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.aggregate {
            Aggregate::Mean { minutes } => write!(
                f,
                "SELECT mean({}) FROM {} WHERE time > now() - {}m AND {}='{}'",
                self.field, self.measurement, minutes, self.tag.key, self.tag.value
            ),
            Aggregate::Last => write!(
                f,
                "SELECT last({}) FROM {} WHERE {}='{}'",
                self.field, self.measurement, self.tag.key, self.tag.value
            ),
        }
    }
}
