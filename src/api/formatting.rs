//! Output formatting for reports and estimates
//!
//! Text lines follow the gateway log layout:
//!
//! ```text
//! [tx-1] RSSI: -60.00, (x=10.00, y=20.00)
//! [Trilateration] Estimated position: (50.00, 50.00)
//! ```

use crate::api::types::{EstimateEvent, OutputFormat, SceneSnapshot};
use crate::core::{PositionEstimate, Report};
use serde::{Deserialize, Serialize};

/// Flat record of one estimate, shared by the JSON and CSV formatters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub sequence: u64,
    pub status: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub transmitters: Vec<String>,
    pub trigger: String,
}

impl EstimateRecord {
    pub fn from_event(event: &EstimateEvent, precision: u8) -> Self {
        let (status, x, y) = match event.estimate {
            PositionEstimate::Located { x, y } => (
                "located",
                Some(round_to_precision(x, precision)),
                Some(round_to_precision(y, precision)),
            ),
            PositionEstimate::Undefined => ("undefined", None, None),
        };
        Self {
            sequence: event.sequence,
            status: status.to_string(),
            x,
            y,
            transmitters: event.transmitters.clone(),
            trigger: event.trigger.identifier.clone(),
        }
    }
}

pub(crate) fn round_to_precision(value: f64, precision: u8) -> f64 {
    let multiplier = 10_f64.powi(precision as i32);
    (value * multiplier).round() / multiplier
}

/// Human-readable text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// Append the transmitters used to each estimate line
    pub include_transmitters: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_report(&self, report: &Report) -> String {
        format!(
            "[{}] RSSI: {:.2}, (x={:.2}, y={:.2})",
            report.identifier, report.rssi, report.position.x, report.position.y
        )
    }

    pub fn format_estimate(&self, estimate: &PositionEstimate) -> String {
        format!("[Trilateration] Estimated position: {}", estimate)
    }

    pub fn format_event(&self, event: &EstimateEvent) -> String {
        let mut line = self.format_estimate(&event.estimate);
        if self.include_transmitters {
            line.push_str(&format!(" from [{}]", event.transmitters.join(", ")));
        }
        line
    }

    /// Multi-line dump of all known transmitters and the latest estimate
    pub fn format_scene(&self, scene: &SceneSnapshot) -> String {
        let mut output = format!("Transmitters ({}):\n", scene.readings.len());
        for reading in &scene.readings {
            output.push_str(&format!(
                "  {} at ({:.1},{:.1}) distance {:.2}\n",
                reading.identifier, reading.position.x, reading.position.y, reading.distance
            ));
        }
        match &scene.estimate {
            Some(estimate) => output.push_str(&format!("Est: {}\n", estimate)),
            None => output.push_str("Est: none\n"),
        }
        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
    /// Decimal places kept for coordinates
    pub precision: Option<u8>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty: true,
            precision: None,
        }
    }

    pub fn format_event(&self, event: &EstimateEvent) -> Result<String, serde_json::Error> {
        let record = EstimateRecord::from_event(event, self.precision.unwrap_or(6));
        self.to_string(&record)
    }

    pub fn format_scene(&self, scene: &SceneSnapshot) -> Result<String, serde_json::Error> {
        self.to_string(scene)
    }

    fn to_string<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// CSV formatter for data logging
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "sequence,status,x,y,transmitters,trigger".to_string()
    }

    pub fn format_event(&self, event: &EstimateEvent) -> String {
        let record = EstimateRecord::from_event(event, 6);
        let coord = |v: Option<f64>| v.map(|v| format!("{:.6}", v)).unwrap_or_default();
        format!(
            "{},{},{},{},{},{}",
            record.sequence,
            record.status,
            coord(record.x),
            coord(record.y),
            record.transmitters.join(";"),
            record.trigger
        )
    }
}

/// Formatter selected at runtime by [`OutputFormat`]
#[derive(Debug, Clone)]
pub struct EventFormatter {
    format: OutputFormat,
    text: TextFormatter,
    json: JsonFormatter,
    csv: CsvFormatter,
}

impl EventFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            text: TextFormatter::new(),
            json: JsonFormatter::new(),
            csv: CsvFormatter::new(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Line emitted before any report is processed
    pub fn preamble(&self) -> Option<String> {
        match self.format {
            OutputFormat::Csv if self.csv.include_header => Some(self.csv.header()),
            _ => None,
        }
    }

    /// Line emitted for every incoming report; only the text format logs reports
    pub fn report_line(&self, report: &Report) -> Option<String> {
        match self.format {
            OutputFormat::Text => Some(self.text.format_report(report)),
            _ => None,
        }
    }

    pub fn event_line(&self, event: &EstimateEvent) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Text => Ok(self.text.format_event(event)),
            OutputFormat::Json => self.json.format_event(event),
            OutputFormat::Csv => Ok(self.csv.format_event(event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point2, Reading};

    fn event(estimate: PositionEstimate) -> EstimateEvent {
        EstimateEvent {
            sequence: 7,
            estimate,
            transmitters: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            trigger: Report {
                identifier: "c".to_string(),
                position: Point2::new(0.0, 100.0),
                rssi: -60.0,
            },
        }
    }

    #[test]
    fn test_text_report_line() {
        let report = Report {
            identifier: "tx-1".to_string(),
            position: Point2::new(10.0, 20.5),
            rssi: -59.987,
        };
        assert_eq!(
            TextFormatter::new().format_report(&report),
            "[tx-1] RSSI: -59.99, (x=10.00, y=20.50)"
        );
    }

    #[test]
    fn test_text_estimate_lines() {
        let formatter = TextFormatter::new();
        assert_eq!(
            formatter.format_event(&event(PositionEstimate::located(50.0, 49.5))),
            "[Trilateration] Estimated position: (50.00, 49.50)"
        );
        assert_eq!(
            formatter.format_event(&event(PositionEstimate::Undefined)),
            "[Trilateration] Estimated position: undefined"
        );

        let verbose = TextFormatter { include_transmitters: true };
        assert!(verbose
            .format_event(&event(PositionEstimate::Undefined))
            .ends_with("from [a, b, c]"));
    }

    #[test]
    fn test_json_event() {
        let json = JsonFormatter::new()
            .format_event(&event(PositionEstimate::located(1.23456789, 2.0)))
            .unwrap();
        let record: EstimateRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.sequence, 7);
        assert_eq!(record.status, "located");
        assert_eq!(record.x, Some(1.234568));
        assert_eq!(record.trigger, "c");

        let json = JsonFormatter::new()
            .format_event(&event(PositionEstimate::Undefined))
            .unwrap();
        assert!(json.contains(r#""status":"undefined""#));
        assert!(json.contains(r#""x":null"#));
    }

    #[test]
    fn test_json_pretty_event() {
        let json = JsonFormatter::pretty()
            .format_event(&event(PositionEstimate::located(1.0, 2.0)))
            .unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains(r#""status": "located""#));
        let record: EstimateRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.y, Some(2.0));
    }

    #[test]
    fn test_csv_rows() {
        let csv = CsvFormatter::new();
        assert_eq!(csv.header(), "sequence,status,x,y,transmitters,trigger");
        assert_eq!(
            csv.format_event(&event(PositionEstimate::located(50.0, 50.0))),
            "7,located,50.000000,50.000000,a;b;c,c"
        );
        assert_eq!(
            csv.format_event(&event(PositionEstimate::Undefined)),
            "7,undefined,,,a;b;c,c"
        );
    }

    #[test]
    fn test_scene_text() {
        let scene = SceneSnapshot {
            readings: vec![Reading::new("a", Point2::new(1.0, 2.0), 10.0)],
            estimate: None,
        };
        let text = TextFormatter::new().format_scene(&scene);
        assert!(text.starts_with("Transmitters (1):"));
        assert!(text.contains("a at (1.0,2.0) distance 10.00"));
        assert!(text.ends_with("Est: none\n"));
    }

    #[test]
    fn test_event_formatter_dispatch() {
        let text = EventFormatter::new(OutputFormat::Text);
        assert!(text.preamble().is_none());
        assert!(text.report_line(&event(PositionEstimate::Undefined).trigger).is_some());

        let csv = EventFormatter::new(OutputFormat::Csv);
        assert_eq!(csv.preamble().unwrap(), CsvFormatter::new().header());
        assert!(csv.report_line(&event(PositionEstimate::Undefined).trigger).is_none());

        let json = EventFormatter::new(OutputFormat::Json);
        assert!(json.event_line(&event(PositionEstimate::Undefined)).unwrap().starts_with('{'));
    }
}
