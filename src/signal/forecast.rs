//! forecast.rs
//! Serie de previsión a 4 horas y distribución de confianza.

use rand::Rng;

use super::{base::profile_for, SignalGenerator};
use crate::models::types::{ConfidenceDistribution, ForecastPoint, ForecastSeries, SignalCfg};

const LABELS: [&str; 5] = ["Now", "+1h", "+2h", "+3h", "+4h"];
const TREND: [i32; 5] = [0, 5, 15, 10, -5];

/// Tendencia fija + perturbación uniforme en [-5, 5), recortada a [0,100].
pub fn build_forecast<R: Rng>(rng: &mut R, base_occupancy: i32) -> ForecastSeries {
    LABELS
        .iter()
        .zip(TREND)
        .map(|(label, offset)| {
            let noise = rng.random_range(-5..5);
            ForecastPoint {
                label: label.to_string(),
                occupancy: (base_occupancy + offset + noise).clamp(0, 100),
            }
        })
        .collect()
}

pub fn confidence_for(base_occupancy: i32, cfg: &SignalCfg) -> ConfidenceDistribution {
    profile_for(base_occupancy, cfg).distribution()
}

impl SignalGenerator {
    /// Continúa la secuencia sembrada, así la previsión es reproducible.
    pub fn forecast(&mut self, base_occupancy: i32) -> ForecastSeries {
        build_forecast(self.rng(), base_occupancy)
    }
}
