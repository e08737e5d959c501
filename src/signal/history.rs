//! history.rs
//!
//! Datos "históricos" y plazas cercanas inventados por render. No hay almacén
//! detrás: todo sale del mismo generador sembrado de la consulta.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use crate::models::types::{HistoryRow, NearbySpot, Place, SpotKind};

const HISTORY_WEATHER: [&str; 5] = ["Clear", "Clear", "Cloudy", "Rain", "Clear"];
const NEARBY_COUNT: usize = 4;
const NEARBY_SPREAD_DEG: f64 = 0.003;

/// Cinco filas a now-1h .. now-5h.
pub fn fabricate_history<R: Rng>(rng: &mut R, address: &str, now: NaiveDateTime) -> Vec<HistoryRow> {
    let sensor_ids: Vec<String> = (0..HISTORY_WEATHER.len())
        .map(|_| format!("SENS-{}", rng.random_range(100..999)))
        .collect();
    let recorded: Vec<i32> = (0..HISTORY_WEATHER.len()).map(|_| rng.random_range(40..80)).collect();

    HISTORY_WEATHER
        .iter()
        .enumerate()
        .map(|(i, weather)| HistoryRow {
            timestamp: now - Duration::hours(i as i64 + 1),
            location: address.to_string(),
            sensor_id: sensor_ids[i].clone(),
            occupancy_recorded: recorded[i],
            weather_condition: weather.to_string(),
        })
        .collect()
}

/// Destino + 4 alternativas desplazadas como mucho ±0.003° en cada eje.
pub fn nearby_spots<R: Rng>(rng: &mut R, place: &Place) -> Vec<NearbySpot> {
    let mut spots = Vec::with_capacity(NEARBY_COUNT + 1);
    spots.push(NearbySpot {
        lat: place.lat,
        lon: place.lon,
        kind: SpotKind::Target,
        color: "#FF4B4BCC".into(),
        size: 60,
    });
    for _ in 0..NEARBY_COUNT {
        let dlat = rng.random_range(-NEARBY_SPREAD_DEG..NEARBY_SPREAD_DEG);
        let dlon = rng.random_range(-NEARBY_SPREAD_DEG..NEARBY_SPREAD_DEG);
        spots.push(NearbySpot {
            lat: place.lat + dlat,
            lon: place.lon + dlon,
            kind: SpotKind::Nearby,
            color: "#1E90FFB3".into(),
            size: 30,
        });
    }
    spots
}
