//! price.rs
//! Coste estimado: tarifa por nivel de ciudad, mitad para moto/patinete, por horas.

use crate::models::types::{SignalCfg, VehicleType};

pub fn estimate_cost(address: &str, vehicle: VehicleType, duration_hours: u32, cfg: &SignalCfg) -> i64 {
    let premium = cfg.premium_cities.iter().any(|c| address.contains(c.as_str()));
    let mut rate = if premium { cfg.premium_rate } else { cfg.standard_rate };
    if vehicle == VehicleType::BikeOrScooter {
        rate /= 2;
    }
    rate * duration_hours as i64
}
