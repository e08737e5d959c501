//! jitter.rs
//!
//! Motor del feed "en vivo": perturba la ocupación base con un delta pequeño
//! en cada tick.
//!
//! - Horas tranquilas (>= 23 o <= 6): delta = 0
//! - Resto: delta ∈ {0 (8/10), -1 (1/10), +1 (1/10)}
//! - Las plazas ocupadas siempre quedan en [0, total_spots]

use rand::Rng;

use crate::models::types::{LiveSnapshot, SignalCfg};

/// Diez casillas equiprobables
const DELTAS: [i32; 10] = [0, 0, 0, 0, 0, 0, 0, 0, -1, 1];

#[derive(Clone, Copy, Debug)]
pub struct LiveJitter {
    pub total_spots: i32,
    pub quiet_from: u8,
    pub quiet_until: u8,
}

impl Default for LiveJitter {
    fn default() -> Self {
        Self::from_cfg(&SignalCfg::default())
    }
}

impl LiveJitter {
    pub fn from_cfg(cfg: &SignalCfg) -> Self {
        Self { total_spots: cfg.total_spots, quiet_from: cfg.quiet_from, quiet_until: cfg.quiet_until }
    }

    pub fn is_quiet(&self, hour: u8) -> bool {
        hour >= self.quiet_from || hour <= self.quiet_until
    }

    pub fn draw_delta<R: Rng>(&self, rng: &mut R, hour: u8) -> i32 {
        if self.is_quiet(hour) {
            return 0;
        }
        DELTAS[rng.random_range(0..DELTAS.len())]
    }

    pub fn tick<R: Rng>(&self, rng: &mut R, base_occupancy: i32, arrival_hour: u8) -> LiveSnapshot {
        let delta = self.draw_delta(rng, arrival_hour);
        self.apply(base_occupancy, delta)
    }

    /// Parte determinista del tick, dado el delta ya sorteado.
    pub fn apply(&self, base_occupancy: i32, delta: i32) -> LiveSnapshot {
        let total = self.total_spots.max(1);
        let occupied_base = total * base_occupancy / 100;
        let occupied = (occupied_base + delta).clamp(0, total);
        LiveSnapshot {
            occupancy_percent: occupied * 100 / total,
            occupied_spots: occupied,
            available_spots: total - occupied,
            recent_delta: -delta,
        }
    }
}
