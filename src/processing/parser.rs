use crate::core::{Point2, Report};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Wire form of a report as published by a transmitter
///
/// `{"deviceId":"…","coordinates":{"x":…,"y":…},"rssi":…}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub device_id: String,
    pub coordinates: Point2,
    pub rssi: f64,
}

impl From<ReportPayload> for Report {
    fn from(payload: ReportPayload) -> Self {
        Report {
            identifier: payload.device_id,
            position: payload.coordinates,
            rssi: payload.rssi,
        }
    }
}

impl From<&Report> for ReportPayload {
    fn from(report: &Report) -> Self {
        ReportPayload {
            device_id: report.identifier.clone(),
            coordinates: report.position,
            rssi: report.rssi,
        }
    }
}

/// Errors that can occur while decoding a report payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid payload format: {details}")]
    InvalidFormat { details: String },
    /// `deviceId` is absent or not a string. Such reports are rejected rather
    /// than stored under a null key, since the store is keyed by identifier.
    #[error("payload has no string field `deviceId`; reports without a string identifier are rejected, not stored under a null key")]
    MissingIdentifier,
    #[error("field `{field}` is not a number: {value}")]
    InvalidField { field: String, value: String },
    #[error("field `{field}` is missing")]
    MissingField { field: String },
}

/// Decoder turning JSON payloads into [`Report`]s
///
/// Missing or `null` numeric fields decode to `NaN` so that a malformed report
/// still reaches the engine and shows up as a `NaN` reading. `null` is what
/// `serde_json` writes for a `NaN` number. With `require_all_fields` set they
/// are rejected instead.
#[derive(Debug, Clone, Default)]
pub struct ReportParser {
    require_all_fields: bool,
}

impl ReportParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject payloads with missing numeric fields instead of decoding them as `NaN`
    pub fn strict() -> Self {
        Self {
            require_all_fields: true,
        }
    }

    pub fn set_require_all_fields(&mut self, required: bool) {
        self.require_all_fields = required;
    }

    /// Parse one payload
    pub fn parse(&self, payload: &str) -> Result<Report, ParseError> {
        let value: Value = serde_json::from_str(payload.trim()).map_err(|e| {
            ParseError::InvalidFormat {
                details: e.to_string(),
            }
        })?;
        let object = value.as_object().ok_or_else(|| ParseError::InvalidFormat {
            details: "payload is not a JSON object".to_string(),
        })?;

        let identifier = object
            .get("deviceId")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingIdentifier)?
            .to_string();

        let coordinates = object.get("coordinates").and_then(Value::as_object);
        let x = self.coordinate(coordinates, "x")?;
        let y = self.coordinate(coordinates, "y")?;
        let rssi = self.number(object, "rssi", "rssi")?;

        Ok(Report {
            identifier,
            position: Point2::new(x, y),
            rssi,
        })
    }

    /// Render a report back into its wire form
    pub fn encode(&self, report: &Report) -> Result<String, ParseError> {
        serde_json::to_string(&ReportPayload::from(report)).map_err(|e| ParseError::InvalidFormat {
            details: e.to_string(),
        })
    }

    fn coordinate(&self, coordinates: Option<&Map<String, Value>>, axis: &str) -> Result<f64, ParseError> {
        let field = format!("coordinates.{}", axis);
        match coordinates {
            Some(map) => self.number(map, axis, &field),
            None => self.missing(&field),
        }
    }

    fn number(&self, map: &Map<String, Value>, key: &str, field: &str) -> Result<f64, ParseError> {
        match map.get(key) {
            None | Some(Value::Null) => self.missing(field),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| ParseError::InvalidField {
                field: field.to_string(),
                value: n.to_string(),
            }),
            Some(other) => Err(ParseError::InvalidField {
                field: field.to_string(),
                value: other.to_string(),
            }),
        }
    }

    fn missing(&self, field: &str) -> Result<f64, ParseError> {
        if self.require_all_fields {
            Err(ParseError::MissingField {
                field: field.to_string(),
            })
        } else {
            Ok(f64::NAN)
        }
    }
}
