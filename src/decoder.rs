//! Decoder for InfluxDB 1.x CSV query responses.
//!
//! A response to a `mean` or `last` query is one header line followed by one
//! data line:
//!
//! ```text
//! name,tags,time,room,value
//! temp,,1588053087,keller,15.5
//! ```
//!
//! Fields are addressed by 1-based column number. The data section starts at
//! the newline that ends the header and keeps it, so field 1 of the response
//! above is `"\ntemp"`. Later fields are unaffected. Quoted fields and
//! multi-row results are not supported.

use chrono::{DateTime, Utc};
use csv_async::{AsyncReaderBuilder, Trim};

use crate::error::{Error, Result};

/// Borrowing decoder over one CSV response body.
///
/// # Example
///
/// ```ignore
/// use influxql_client::CsvResponseDecoder;
///
/// let decoder = CsvResponseDecoder::new("name,tags,time,mean\ntemp,,1588053087,15.5");
/// assert_eq!(decoder.field(3)?, "1588053087");
/// assert_eq!(decoder.float(4)?, 15.5);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CsvResponseDecoder<'a> {
    payload: &'a str,
}

impl<'a> CsvResponseDecoder<'a> {
    /// Create a decoder for a response body.
    pub fn new(payload: &'a str) -> Self {
        Self { payload }
    }

    /// The raw response body.
    pub fn payload(&self) -> &'a str {
        self.payload
    }

    /// Everything from the newline that terminates the header row onwards.
    ///
    /// Returns [`Error::EmptyResult`] if there is no such newline or nothing
    /// but whitespace follows it.
    pub fn data_section(&self) -> Result<&'a str> {
        // A newline in the first byte does not terminate a header.
        let newline = self
            .payload
            .bytes()
            .skip(1)
            .position(|b| b == b'\n')
            .map(|pos| pos + 1)
            .ok_or(Error::EmptyResult)?;

        let data = &self.payload[newline..];
        if data.trim().is_empty() {
            return Err(Error::EmptyResult);
        }
        Ok(data)
    }

    /// Number of comma-separated fields in the data section.
    pub fn field_count(&self) -> Result<usize> {
        Ok(self.data_section()?.split(',').count())
    }

    /// Get field `field_number` (1-based) of the data row as raw text.
    ///
    /// The last field runs to the end of the body.
    pub fn field(&self, field_number: usize) -> Result<&'a str> {
        let data = self.data_section()?;
        let out_of_range = || Error::FieldOutOfRange {
            field: field_number,
            available: data.split(',').count(),
        };

        if field_number == 0 {
            return Err(out_of_range());
        }
        data.split(',')
            .nth(field_number - 1)
            .ok_or_else(out_of_range)
    }

    /// Get a field parsed as `f64`.
    pub fn float(&self, field_number: usize) -> Result<f64> {
        let text = self.field(field_number)?.trim();
        text.parse::<f64>().map_err(|e| Error::Parse {
            message: format!("Invalid float '{}' in field {}: {}", text, field_number, e),
        })
    }

    /// Get a field parsed as `i64`.
    pub fn int(&self, field_number: usize) -> Result<i64> {
        let text = self.field(field_number)?.trim();
        text.parse::<i64>().map_err(|e| Error::Parse {
            message: format!("Invalid integer '{}' in field {}: {}", text, field_number, e),
        })
    }

    /// Get a field holding epoch seconds as a UTC timestamp.
    pub fn timestamp(&self, field_number: usize) -> Result<DateTime<Utc>> {
        let secs = self.int(field_number)?;
        DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::Parse {
            message: format!("Timestamp {} in field {} is out of range", secs, field_number),
        })
    }

    /// Look up the 1-based number of a column by its header name.
    pub async fn column_number(&self, name: &str) -> Result<usize> {
        let mut reader = AsyncReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Fields)
            .flexible(true)
            .create_reader(self.payload.as_bytes());

        let headers = reader
            .headers()
            .await
            .map_err(|e| Error::Csv(e.to_string()))?;

        headers
            .iter()
            .position(|column| column == name)
            .map(|i| i + 1)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Get the field under the named header column, parsed as `f64`.
    pub async fn float_named(&self, name: &str) -> Result<f64> {
        let field_number = self.column_number(name).await?;
        self.float(field_number)
    }
}

/// Get field `field_number` (1-based) of the data row of `payload`.
pub fn extract_field(field_number: usize, payload: &str) -> Result<&str> {
    CsvResponseDecoder::new(payload).field(field_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "name,tags,time,room,value\ntemp,,1588053087,keller,15.5";

    #[test]
    fn test_extract_field_time() {
        assert_eq!(extract_field(3, RESPONSE).unwrap(), "1588053087");
    }

    #[test]
    fn test_extract_last_field() {
        assert_eq!(extract_field(5, RESPONSE).unwrap(), "15.5");
    }

    #[test]
    fn test_first_field_keeps_newline() {
        assert_eq!(extract_field(1, RESPONSE).unwrap(), "\ntemp");
        assert_eq!(extract_field(2, RESPONSE).unwrap(), "");
        assert_eq!(extract_field(4, RESPONSE).unwrap(), "keller");
    }

    #[test]
    fn test_data_section() {
        let decoder = CsvResponseDecoder::new(RESPONSE);
        assert_eq!(
            decoder.data_section().unwrap(),
            "\ntemp,,1588053087,keller,15.5"
        );
        assert_eq!(decoder.field_count().unwrap(), 5);
    }

    #[test]
    fn test_no_newline_is_empty_result() {
        let err = extract_field(1, "name,tags,time,mean").unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
    }

    #[test]
    fn test_empty_payload() {
        assert!(matches!(extract_field(1, ""), Err(Error::EmptyResult)));
    }

    #[test]
    fn test_header_only_with_trailing_newline() {
        let err = extract_field(1, "name,tags,time,mean\n").unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
    }

    #[test]
    fn test_leading_newline_is_not_a_row_separator() {
        let err = extract_field(1, "\nname,tags").unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
    }

    #[test]
    fn test_field_out_of_range() {
        let err = extract_field(6, RESPONSE).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldOutOfRange {
                field: 6,
                available: 5
            }
        ));
    }

    #[test]
    fn test_field_zero() {
        let err = extract_field(0, RESPONSE).unwrap_err();
        assert!(matches!(err, Error::FieldOutOfRange { field: 0, .. }));
    }

    #[test]
    fn test_typed_fields() {
        let decoder = CsvResponseDecoder::new(RESPONSE);
        assert_eq!(decoder.float(5).unwrap(), 15.5);
        assert_eq!(decoder.int(3).unwrap(), 1588053087);
        assert_eq!(decoder.timestamp(3).unwrap().timestamp(), 1588053087);
    }

    #[test]
    fn test_float_trims_trailing_newline() {
        let decoder = CsvResponseDecoder::new("name,tags,time,mean\ntemp,,0,21.25\n");
        assert_eq!(decoder.field(4).unwrap(), "21.25\n");
        assert_eq!(decoder.float(4).unwrap(), 21.25);
    }

    #[test]
    fn test_parse_error() {
        let decoder = CsvResponseDecoder::new(RESPONSE);
        let err = decoder.float(4).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("keller"));
    }

    #[tokio::test]
    async fn test_column_number() {
        let decoder = CsvResponseDecoder::new(RESPONSE);
        assert_eq!(decoder.column_number("name").await.unwrap(), 1);
        assert_eq!(decoder.column_number("value").await.unwrap(), 5);
        assert!(matches!(
            decoder.column_number("humidity").await,
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_csv_error_single_prefix() {
        let err = Error::Csv("invalid UTF-8 in header".to_string());
        assert_eq!(err.to_string(), "CSV parse error: invalid UTF-8 in header");
    }

    #[tokio::test]
    async fn test_float_named() {
        let decoder = CsvResponseDecoder::new(RESPONSE);
        assert_eq!(decoder.float_named("value").await.unwrap(), 15.5);
    }
}
