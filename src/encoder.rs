//! InfluxDB line protocol encoder.
//!
//! Format: `measurement,tag=value field=value[,field2=value2] [timestamp]`
//!
//! Example: `temperature,room=keller value=15.5`
//!
//! Names are written as given. Commas, spaces or equals signs inside a
//! measurement, field or tag produce a broken line; the encoder does not
//! escape or reject them.
//!
//! Values use the `Display` formatting of `f64`: the shortest text that parses
//! back to the same float, so `15.5` stays `15.5` and `18.0` becomes `18`.

use std::fmt::Write;

use crate::types::{DataPoint, Tag};

/// Line protocol encoder.
pub struct LineProtocolEncoder;

impl LineProtocolEncoder {
    /// Encode a single value: `measurement,key=value value=<value>`.
    pub fn encode_value(measurement: &str, tag: &Tag, value: f64) -> String {
        let mut line = String::new();
        push_series(&mut line, measurement, tag);
        let _ = write!(line, " value={}", value);
        line
    }

    /// Encode several fields of one measurement into one line:
    /// `measurement,key=value f1=v1,f2=v2`.
    ///
    /// Fields keep the order they are given in. Each point's name is the field name.
    /// A line has one timestamp: the first field's, in epoch seconds, if it has one.
    pub fn encode_fields(measurement: &str, tag: &Tag, fields: &[DataPoint]) -> String {
        let mut line = String::new();
        push_series(&mut line, measurement, tag);

        for (i, field) in fields.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            let _ = write!(line, "{}={}", field.name, field.value);
        }
        if let Some(secs) = fields.first().and_then(DataPoint::epoch_seconds) {
            let _ = write!(line, " {}", secs);
        }
        line
    }

    /// Encode one line per point, each terminated by `\n`.
    ///
    /// Each point's name is the measurement. Points carrying a timestamp get
    /// it appended in epoch seconds.
    pub fn encode_points(points: &[DataPoint], tag: &Tag) -> String {
        let mut payload = String::new();

        for point in points {
            payload.push_str(&Self::encode_value(&point.name, tag, point.value));
            if let Some(secs) = point.epoch_seconds() {
                let _ = write!(payload, " {}", secs);
            }
            payload.push('\n');
        }
        payload
    }
}

fn push_series(line: &mut String, measurement: &str, tag: &Tag) {
    let _ = write!(line, "{},{}={}", measurement, tag.key, tag.value);
}
