//! base.rs
//!
//! Ocupación base determinista por (dirección, hora, día):
//! - sorteo uniforme en [base_min, base_max)
//! - +peak_bonus en hora punta (17..=21)
//! - +mall_bonus si la dirección contiene "Mall" (coincidencia literal)
//! - perfil de confianza según ocupación < 50

use rand::Rng;

use super::SignalGenerator;
use crate::models::types::{BaseState, ConfidenceProfile, DayOfWeek, SignalCfg};

/// Siembra el generador y deriva el estado base. Devuelve también el generador
/// para que previsión e histórico continúen la misma secuencia de sorteos.
pub fn derive_base_state(
    address: &str,
    arrival_hour: u8,
    day: DayOfWeek,
    cfg: &SignalCfg,
) -> (BaseState, SignalGenerator) {
    let mut gen = SignalGenerator::seeded(address, arrival_hour, day);
    let base = gen.base_state(address, arrival_hour, cfg);
    (base, gen)
}

impl SignalGenerator {
    pub fn base_state(&mut self, address: &str, arrival_hour: u8, cfg: &SignalCfg) -> BaseState {
        let draw = self.rng().random_range(cfg.base_min..cfg.base_max);
        let contains_mall = address.contains(cfg.mall_marker.as_str());
        let occupancy = base_occupancy(draw, arrival_hour, contains_mall, cfg);
        BaseState { occupancy, profile: profile_for(occupancy, cfg) }
    }
}

/// Parte aritmética de la derivación, sin aleatoriedad.
pub fn base_occupancy(draw: i32, arrival_hour: u8, contains_mall: bool, cfg: &SignalCfg) -> i32 {
    let mut occ = draw;
    if (cfg.peak_start..=cfg.peak_end).contains(&arrival_hour) {
        occ += cfg.peak_bonus;
    }
    if contains_mall {
        occ += cfg.mall_bonus;
    }
    if cfg.clamp_base {
        occ = occ.clamp(0, 100);
    }
    occ
}

pub fn profile_for(occupancy: i32, cfg: &SignalCfg) -> ConfidenceProfile {
    if occupancy < cfg.low_occupancy_below {
        ConfidenceProfile::LowOccupancy
    } else {
        ConfidenceProfile::HighOccupancy
    }
}
