//! Simulated transmitters for testing and development
//!
//! A simulated transmitter picks fixed random coordinates once and then emits
//! reports around a base signal strength with a small uniform noise, rendered
//! in the same JSON layout real transmitters publish.

use crate::api::formatting::round_to_precision;
use crate::core::{Point2, Report};
use crate::processing::ReportPayload;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default base signal strength of a simulated transmitter (dBm)
pub const DEFAULT_BASE_RSSI: f64 = -60.0;

/// Default peak-to-peak noise added to each sample (dB)
pub const DEFAULT_NOISE_SPAN: f64 = 2.0;

/// Area in which simulated transmitters are placed, per axis
pub const PLACEMENT_RANGE: std::ops::Range<f64> = 10.0..100.0;

/// Decimal places of numbers in rendered payloads
const PAYLOAD_PRECISION: u8 = 2;

/// Transmitter emitting noisy signal-strength reports from a fixed position
#[derive(Debug, Clone)]
pub struct SimulatedTransmitter {
    identifier: String,
    position: Point2,
    base_rssi: f64,
    noise_span: f64,
    rng: StdRng,
}

impl SimulatedTransmitter {
    /// Create a transmitter with random identifier and position
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible transmitter for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let suffix: u32 = rng.gen();
        let position = Point2::new(
            rng.gen_range(PLACEMENT_RANGE),
            rng.gen_range(PLACEMENT_RANGE),
        );
        Self {
            identifier: format!("transmitter-{:08x}", suffix),
            position,
            base_rssi: DEFAULT_BASE_RSSI,
            noise_span: DEFAULT_NOISE_SPAN,
            rng,
        }
    }

    /// Place the transmitter explicitly
    pub fn at(mut self, position: Point2) -> Self {
        self.position = position;
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_base_rssi(mut self, base_rssi: f64) -> Self {
        self.base_rssi = base_rssi;
        self
    }

    /// Peak-to-peak noise; 0 disables noise
    pub fn with_noise_span(mut self, noise_span: f64) -> Self {
        self.noise_span = noise_span.max(0.0);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Next report: base strength plus uniform noise in `[-span/2, span/2)`
    pub fn next_report(&mut self) -> Report {
        let noise = if self.noise_span > 0.0 {
            (self.rng.gen::<f64>() - 0.5) * self.noise_span
        } else {
            0.0
        };
        Report {
            identifier: self.identifier.clone(),
            position: self.position,
            rssi: self.base_rssi + noise,
        }
    }

    /// Next report rendered as a JSON payload, numbers rounded to two decimals.
    ///
    /// A `NaN` number is written as `null`.
    pub fn next_payload(&mut self) -> Result<String, serde_json::Error> {
        let report = self.next_report();
        let payload = ReportPayload {
            device_id: report.identifier,
            coordinates: Point2::new(
                round_to_precision(report.position.x, PAYLOAD_PRECISION),
                round_to_precision(report.position.y, PAYLOAD_PRECISION),
            ),
            rssi: round_to_precision(report.rssi, PAYLOAD_PRECISION),
        };
        serde_json::to_string(&payload)
    }
}

impl Default for SimulatedTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Create `count` transmitters, seeded from `seed` when given
pub fn spawn_transmitters(count: usize, seed: Option<u64>) -> Vec<SimulatedTransmitter> {
    (0..count)
        .map(|i| match seed {
            Some(seed) => SimulatedTransmitter::with_seed(seed.wrapping_add(i as u64)),
            None => SimulatedTransmitter::new(),
        })
        .collect()
}
