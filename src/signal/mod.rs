//! signal
//!
//! Generador de señal sintética: a partir de dirección, hora y día produce
//! ocupación base, precio, previsión, perfil de confianza, histórico inventado
//! y el jitter del feed en vivo.
//!
//! El generador pseudoaleatorio es un valor explícito (`SignalGenerator`) que
//! se pasa por la cadena de llamadas; nunca hay un RNG global, así dos sesiones
//! concurrentes no se pisan la secuencia de sorteos.

pub mod base;
pub mod forecast;
pub mod history;
pub mod jitter;
pub mod price;

use chrono::NaiveDateTime;
use rand::{rngs::StdRng, SeedableRng};

use crate::models::types::{
    BaseState, ContextInputs, DayOfWeek, ForecastSeries, HistoryRow, NearbySpot, Place, SignalCfg,
};

pub use base::derive_base_state;
pub use forecast::{build_forecast, confidence_for};
pub use history::{fabricate_history, nearby_spots};
pub use jitter::LiveJitter;
pub use price::estimate_cost;

/// Semilla = suma de códigos de carácter de la dirección + hora + índice del día.
pub fn seed_for(address: &str, arrival_hour: u8, day: DayOfWeek) -> u64 {
    let chars: u64 = address.chars().map(|c| c as u64).sum();
    chars + arrival_hour as u64 + day.index() as u64
}

/// RNG sembrado por consulta. Mismas entradas => misma secuencia de sorteos.
pub struct SignalGenerator {
    rng: StdRng,
}

impl SignalGenerator {
    pub fn seeded(address: &str, arrival_hour: u8, day: DayOfWeek) -> Self {
        Self::from_seed(seed_for(address, arrival_hour, day))
    }

    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Todo lo que sale del generador sembrado para una consulta.
#[derive(Clone, Debug)]
pub struct SeededSignals {
    pub base: BaseState,
    pub nearby: Vec<NearbySpot>,
    /// Delta del primer panel en vivo (0 en horas tranquilas)
    pub first_delta: i32,
    pub forecast: ForecastSeries,
    pub history: Vec<HistoryRow>,
}

/// Orden de sorteos: base, plazas cercanas, primer jitter, previsión, histórico.
pub fn synthesize(
    address: &str,
    place: &Place,
    inputs: &ContextInputs,
    now: NaiveDateTime,
    cfg: &SignalCfg,
) -> SeededSignals {
    let (base, mut gen) = derive_base_state(address, inputs.arrival_hour, inputs.day, cfg);
    let nearby = nearby_spots(gen.rng(), place);
    let first_delta = LiveJitter::from_cfg(cfg).draw_delta(gen.rng(), inputs.arrival_hour);
    let forecast = gen.forecast(base.occupancy);
    let history = fabricate_history(gen.rng(), address, now);
    SeededSignals { base, nearby, first_delta, forecast, history }
}
