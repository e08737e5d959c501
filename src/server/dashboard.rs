//! dashboard.rs
//!
//! Flujo completo de una consulta:
//! resolver dirección -> coste -> semilla -> ocupación base -> plazas cercanas
//! -> primer panel en vivo -> previsión -> confianza -> histórico.
//!
//! El orden de sorteos sobre el generador sembrado es parte del contrato:
//! mismas entradas => mismo dashboard (salvo clima y hora).

use anyhow::{Context, Result};
use chrono::Local;
use rand::Rng;
use tracing::{info, warn};

use super::{geocoder::GeocoderClient, weather::WeatherClient};
use crate::models::types::{
    AppCfg, CongestionLevel, ContextInputs, Dashboard, LivePanel, LiveSnapshot, ModelInfo, Place,
};
use crate::signal::{confidence_for, estimate_cost, synthesize, LiveJitter};

/// Enlace profundo para apps de mapas. El formato es fijo.
pub fn maps_link(lat: f64, lon: f64) -> String {
    format!("https://www.google.com/maps/search/?api=1&query={lat},{lon}")
}

/// Lo que necesita cada tick del feed en vivo.
#[derive(Clone, Debug)]
pub struct LiveContext {
    pub place: Place,
    pub base_occupancy: i32,
    pub arrival_hour: u8,
    pub est_cost: i64,
}

pub struct Services {
    pub geocoder: GeocoderClient,
    pub weather: WeatherClient,
    pub jitter: LiveJitter,
    pub cfg: AppCfg,
}

impl Services {
    pub fn new(http: reqwest::Client, cfg: AppCfg) -> Self {
        Self {
            geocoder: GeocoderClient::new(http.clone(), &cfg),
            weather: WeatherClient::new(http, &cfg),
            jitter: LiveJitter::from_cfg(&cfg.signal),
            cfg,
        }
    }

    /// `Ok(None)` = sin entrada todavía (dirección vacía o no encontrada).
    pub async fn build_dashboard(&self, address: &str, inputs: &ContextInputs) -> Result<Option<Dashboard>> {
        if address.trim().is_empty() {
            return Ok(None);
        }
        inputs.validate()?;

        let Some(place) = self
            .geocoder
            .resolve(address)
            .await
            .with_context(|| format!("geocoding '{address}'"))?
        else {
            info!("dirección no encontrada: {address}");
            return Ok(None);
        };

        let cfg = &self.cfg.signal;
        let est_cost = estimate_cost(address, inputs.vehicle, inputs.duration_hours, cfg);
        let seeded = synthesize(address, &place, inputs, Local::now().naive_local(), cfg);
        let base = seeded.base;

        let ctx = LiveContext {
            place: place.clone(),
            base_occupancy: base.occupancy,
            arrival_hour: inputs.arrival_hour,
            est_cost,
        };
        let live = self.render_panel(&ctx, self.jitter.apply(base.occupancy, seeded.first_delta), 0).await;

        info!(
            "dashboard OK: {} base={} perfil={:?} coste={}",
            place.address, base.occupancy, base.profile, est_cost
        );

        Ok(Some(Dashboard {
            place,
            inputs: inputs.clone(),
            base,
            confidence: confidence_for(base.occupancy, cfg),
            est_cost,
            forecast: seeded.forecast,
            nearby: seeded.nearby,
            history: seeded.history,
            live,
            model: ModelInfo::default(),
        }))
    }

    /// Un tick del feed: jitter + clima + estado derivado.
    pub async fn live_panel<R: Rng>(&self, ctx: &LiveContext, rng: &mut R, tick: u64) -> LivePanel {
        let snapshot = self.jitter.tick(rng, ctx.base_occupancy, ctx.arrival_hour);
        self.render_panel(ctx, snapshot, tick).await
    }

    async fn render_panel(&self, ctx: &LiveContext, snapshot: LiveSnapshot, tick: u64) -> LivePanel {
        let weather = self.weather.fetch_weather(ctx.place.lat, ctx.place.lon).await;
        if let Some(reason) = weather.reason() {
            warn!("clima no disponible, usando valor por defecto: {reason}");
        }
        let weather_fallback = weather.is_fallback();
        let weather = weather.into_value();

        let parking_full = snapshot.available_spots == 0;
        let navigation = (!parking_full).then(|| maps_link(ctx.place.lat, ctx.place.lon));

        LivePanel {
            congestion: CongestionLevel::from_percent(snapshot.occupancy_percent),
            wet_road_alert: weather.wet_road(),
            weather,
            weather_fallback,
            snapshot,
            est_cost: ctx.est_cost,
            updated_at: Local::now().format("%H:%M:%S").to_string(),
            navigation,
            parking_full,
            tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Duration;

    fn services() -> Services {
        let cfg = AppCfg {
            weather_url: "http://127.0.0.1:9".into(),
            weather_timeout: Duration::from_millis(200),
            ..AppCfg::default()
        };
        Services::new(reqwest::Client::new(), cfg)
    }

    fn ctx(base_occupancy: i32, arrival_hour: u8) -> LiveContext {
        LiveContext {
            place: Place { address: "Phoenix Marketcity, Bangalore".into(), lat: 12.9975, lon: 77.6963 },
            base_occupancy,
            arrival_hour,
            est_cost: 160,
        }
    }

    #[tokio::test]
    async fn full_lot_reports_parking_full_without_navigation() {
        let svc = services();
        let mut rng = StdRng::seed_from_u64(11);
        // 02:00 es hora tranquila: sin jitter, 320 de 320 ocupadas
        let panel = svc.live_panel(&ctx(100, 2), &mut rng, 1).await;
        assert_eq!(panel.snapshot.available_spots, 0);
        assert!(panel.parking_full);
        assert_eq!(panel.navigation, None);
        assert_eq!(panel.congestion, CongestionLevel::Critical);

        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["parking_full"], true);
        assert!(json["navigation"].is_null());
    }

    #[tokio::test]
    async fn free_spots_keep_navigation() {
        let svc = services();
        let mut rng = StdRng::seed_from_u64(12);
        let panel = svc.live_panel(&ctx(40, 3), &mut rng, 1).await;
        assert_eq!(panel.snapshot.available_spots, 192);
        assert!(!panel.parking_full);
        assert_eq!(panel.navigation.as_deref(), Some(maps_link(12.9975, 77.6963).as_str()));
    }

    #[test]
    fn maps_link_format() {
        assert_eq!(
            maps_link(28.6315, 77.2167),
            "https://www.google.com/maps/search/?api=1&query=28.6315,77.2167"
        );
        assert_eq!(
            maps_link(-33.8688, 151.2093),
            "https://www.google.com/maps/search/?api=1&query=-33.8688,151.2093"
        );
    }
}
