//! types.rs
//! Modelos de datos compartidos por el servicio: entradas del usuario,
//! configuración del generador de señal, salidas del dashboard y del feed en vivo

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr, time::Duration};

use crate::error::{ProviderError, ValidationError};

// -------------------------------
// Entradas
// -------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Lunes = 0 .. Domingo = 6 (entra en la semilla)
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl FromStr for DayOfWeek {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let d = match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => DayOfWeek::Monday,
            "tuesday" | "tue" => DayOfWeek::Tuesday,
            "wednesday" | "wed" => DayOfWeek::Wednesday,
            "thursday" | "thu" => DayOfWeek::Thursday,
            "friday" | "fri" => DayOfWeek::Friday,
            "saturday" | "sat" => DayOfWeek::Saturday,
            "sunday" | "sun" => DayOfWeek::Sunday,
            _ => return Err(ValidationError::UnknownDay(s.to_string())),
        };
        Ok(d)
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum VehicleType {
    Car,
    #[serde(rename = "Bike/Scooter")]
    BikeOrScooter,
}

impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleType::Car),
            "bike/scooter" | "bikeorscooter" | "bike" | "scooter" => Ok(VehicleType::BikeOrScooter),
            _ => Err(ValidationError::UnknownVehicle(s.to_string())),
        }
    }
}

impl TryFrom<String> for VehicleType {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

/// Contexto de la consulta: hora de llegada, duración, día y vehículo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextInputs {
    /// Hora de llegada 0..=23
    pub arrival_hour: u8,
    /// Duración en horas 1..=12
    pub duration_hours: u32,
    pub day: DayOfWeek,
    pub vehicle: VehicleType,
}

impl Default for ContextInputs {
    fn default() -> Self {
        // mismos valores iniciales que los controles del dashboard
        Self { arrival_hour: 18, duration_hours: 2, day: DayOfWeek::Monday, vehicle: VehicleType::Car }
    }
}

impl ContextInputs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.arrival_hour > 23 {
            return Err(ValidationError::HourOutOfRange(self.arrival_hour));
        }
        if !(1..=12).contains(&self.duration_hours) {
            return Err(ValidationError::DurationOutOfRange(self.duration_hours));
        }
        Ok(())
    }
}

/// Petición completa del dashboard (dirección + contexto).
#[derive(Clone, Debug, Deserialize)]
pub struct DashboardQuery {
    pub address: String,
    #[serde(default = "default_hour", alias = "hour")]
    pub arrival_hour: u8,
    #[serde(default = "default_duration", alias = "duration")]
    pub duration_hours: u32,
    #[serde(default = "default_day")]
    pub day: DayOfWeek,
    #[serde(default = "default_vehicle")]
    pub vehicle: VehicleType,
}

fn default_hour() -> u8 { ContextInputs::default().arrival_hour }
fn default_duration() -> u32 { ContextInputs::default().duration_hours }
fn default_day() -> DayOfWeek { DayOfWeek::Monday }
fn default_vehicle() -> VehicleType { VehicleType::Car }

impl DashboardQuery {
    pub fn inputs(&self) -> ContextInputs {
        ContextInputs {
            arrival_hour: self.arrival_hour,
            duration_hours: self.duration_hours,
            day: self.day,
            vehicle: self.vehicle,
        }
    }
}

// -------------------------------
// Geocodificación
// -------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

/// Par (label, value) del autocompletado; ambos son la dirección completa.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub value: String,
}

/// Resultado de un proveedor externo: dato real o valor de reserva con su causa.
#[derive(Debug)]
pub enum Sourced<T> {
    Live(T),
    Fallback { value: T, reason: ProviderError },
}

impl<T> Sourced<T> {
    pub fn value(&self) -> &T {
        match self {
            Sourced::Live(v) => v,
            Sourced::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Sourced::Live(v) => v,
            Sourced::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Sourced::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&ProviderError> {
        match self {
            Sourced::Live(_) => None,
            Sourced::Fallback { reason, .. } => Some(reason),
        }
    }
}

// -------------------------------
// Clima
// -------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rainy,
    /// Sólo lo produce el valor de reserva
    Sunny,
}

impl WeatherCondition {
    /// Código numérico del proveedor -> tres cubos
    pub fn from_code(code: f64) -> Self {
        if code > 50.0 {
            WeatherCondition::Rainy
        } else if code > 3.0 {
            WeatherCondition::Cloudy
        } else {
            WeatherCondition::Clear
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear ☀️",
            WeatherCondition::Cloudy => "Cloudy ☁️",
            WeatherCondition::Rainy => "Rainy 🌧️",
            WeatherCondition::Sunny => "Sunny ☀️",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub condition: WeatherCondition,
    pub label: String,
}

impl WeatherReading {
    pub fn new(temperature_c: f64, condition: WeatherCondition) -> Self {
        Self { temperature_c, condition, label: condition.label().to_string() }
    }

    /// (24.5 °C, Sunny) cuando el proveedor falla
    pub fn fallback() -> Self {
        Self::new(24.5, WeatherCondition::Sunny)
    }

    pub fn wet_road(&self) -> bool {
        self.label.contains("Rain")
    }
}

// -------------------------------
// Señal sintética
// -------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConfidenceProfile {
    LowOccupancy,
    HighOccupancy,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConfidenceDistribution {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl ConfidenceDistribution {
    pub fn total(&self) -> f64 {
        self.high + self.medium + self.low
    }
}

impl ConfidenceProfile {
    pub fn distribution(self) -> ConfidenceDistribution {
        match self {
            ConfidenceProfile::LowOccupancy => ConfidenceDistribution { high: 0.85, medium: 0.10, low: 0.05 },
            ConfidenceProfile::HighOccupancy => ConfidenceDistribution { high: 0.10, medium: 0.30, low: 0.60 },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BaseState {
    pub occupancy: i32,
    pub profile: ConfidenceProfile,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForecastPoint {
    pub label: String,
    pub occupancy: i32,
}

pub type ForecastSeries = Vec<ForecastPoint>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LiveSnapshot {
    pub occupancy_percent: i32,
    pub occupied_spots: i32,
    pub available_spots: i32,
    /// Negación del delta sorteado (convención de presentación)
    pub recent_delta: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CongestionLevel {
    Smooth,
    Busy,
    Critical,
}

impl CongestionLevel {
    pub fn from_percent(p: i32) -> Self {
        if p > 85 {
            CongestionLevel::Critical
        } else if p > 60 {
            CongestionLevel::Busy
        } else {
            CongestionLevel::Smooth
        }
    }
}

/// Panel del feed en vivo, recalculado en cada tick.
#[derive(Clone, Debug, Serialize)]
pub struct LivePanel {
    pub snapshot: LiveSnapshot,
    pub congestion: CongestionLevel,
    pub weather: WeatherReading,
    pub weather_fallback: bool,
    pub wet_road_alert: bool,
    pub est_cost: i64,
    pub updated_at: String,
    /// Enlace de navegación; `None` cuando el parking está lleno
    pub navigation: Option<String>,
    /// "Parking Full": no queda ninguna plaza libre
    pub parking_full: bool,
    pub tick: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct HistoryRow {
    pub timestamp: NaiveDateTime,
    pub location: String,
    pub sensor_id: String,
    pub occupancy_recorded: i32,
    pub weather_condition: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SpotKind {
    Target,
    Nearby,
}

#[derive(Clone, Debug, Serialize)]
pub struct NearbySpot {
    pub lat: f64,
    pub lon: f64,
    pub kind: SpotKind,
    pub color: String,
    pub size: u32,
}

/// Metadatos fijos del "modelo" que muestra el panel de inferencia.
#[derive(Clone, Debug, Serialize)]
pub struct ModelInfo {
    pub algorithm: &'static str,
    pub accuracy_pct: f32,
    pub data_source: &'static str,
    pub feature_weights: [(&'static str, f32); 2],
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            algorithm: "Random Forest",
            accuracy_pct: 94.2,
            data_source: "OpenStreetMap API",
            feature_weights: [("Time", 0.4), ("Density", 0.3)],
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    pub place: Place,
    pub inputs: ContextInputs,
    pub base: BaseState,
    pub confidence: ConfidenceDistribution,
    pub est_cost: i64,
    pub forecast: ForecastSeries,
    pub nearby: Vec<NearbySpot>,
    pub history: Vec<HistoryRow>,
    pub live: LivePanel,
    pub model: ModelInfo,
}

// -------------------------------
// Configuración
// -------------------------------

#[derive(Clone, Debug)]
pub struct SignalCfg {
    /// Rango del sorteo base [min, max)
    pub base_min: i32,
    pub base_max: i32,

    /// Franja de hora punta (inclusive) y su bonus
    pub peak_start: u8,
    pub peak_end: u8,
    pub peak_bonus: i32,

    /// Subcadena (sensible a mayúsculas) que marca un centro comercial
    pub mall_marker: String,
    pub mall_bonus: i32,

    /// Recorta la ocupación base a [0,100] en origen
    pub clamp_base: bool,

    /// Umbral del perfil de confianza
    pub low_occupancy_below: i32,

    pub total_spots: i32,

    /// Horas tranquilas: hora >= quiet_from o hora <= quiet_until
    pub quiet_from: u8,
    pub quiet_until: u8,

    pub premium_rate: i64,
    pub standard_rate: i64,
    pub premium_cities: Vec<String>,
}

impl Default for SignalCfg {
    fn default() -> Self {
        Self {
            base_min: 20,
            base_max: 45,
            peak_start: 17,
            peak_end: 21,
            peak_bonus: 35,
            mall_marker: "Mall".into(),
            mall_bonus: 10,
            clamp_base: true,
            low_occupancy_below: 50,
            total_spots: 320,
            quiet_from: 23,
            quiet_until: 6,
            premium_rate: 80,
            standard_rate: 40,
            premium_cities: ["Delhi", "Mumbai", "Bangalore", "Gurgaon", "Noida"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCfg {
    /// Dirección/puerto del servidor HTTP (Axum)
    pub bind: String,

    /// Proveedor de geocodificación (API compatible con Nominatim)
    pub geocoder_url: String,
    pub geocoder_timeout: Duration,
    pub max_suggestions: usize,

    /// Proveedor de clima (API compatible con Open-Meteo)
    pub weather_url: String,
    pub weather_timeout: Duration,

    pub user_agent: String,

    /// Periodo del feed en vivo
    pub refresh: Duration,
    /// Caducidad de sesiones sin lecturas
    pub session_ttl: Duration,
    /// Sesiones abiertas a la vez (cada una consulta el clima en cada tick)
    pub max_sessions: usize,

    pub signal: SignalCfg,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            geocoder_url: "https://nominatim.openstreetmap.org".into(),
            geocoder_timeout: Duration::from_secs(10),
            max_suggestions: 5,
            weather_url: "https://api.open-meteo.com".into(),
            weather_timeout: Duration::from_secs(5),
            user_agent: concat!("cityspot/", env!("CARGO_PKG_VERSION")).into(),
            refresh: Duration::from_secs(3),
            session_ttl: Duration::from_secs(600),
            max_sessions: 100,
            signal: SignalCfg::default(),
        }
    }
}

impl AppCfg {
    /// Defaults + overrides desde variables de entorno.
    pub fn from_env() -> Self {
        let mut c = AppCfg::default();
        if let Ok(v) = env::var("BIND") { c.bind = v; }
        if let Ok(v) = env::var("GEOCODER_URL") { c.geocoder_url = v; }
        if let Ok(v) = env::var("WEATHER_URL") { c.weather_url = v; }
        if let Ok(v) = env::var("USER_AGENT") { c.user_agent = v; }
        if let Some(s) = env_secs("GEOCODER_TIMEOUT_S") { c.geocoder_timeout = s; }
        if let Some(s) = env_secs("WEATHER_TIMEOUT_S") { c.weather_timeout = s; }
        if let Some(s) = env_secs("REFRESH_S") { c.refresh = s; }
        if let Some(s) = env_secs("SESSION_TTL_S") { c.session_ttl = s; }
        if let Ok(v) = env::var("MAX_SUGGESTIONS") { c.max_suggestions = v.parse().unwrap_or(c.max_suggestions); }
        if let Ok(v) = env::var("MAX_SESSIONS") { c.max_sessions = v.parse().unwrap_or(c.max_sessions); }
        c
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    env::var(key).ok()?.parse::<u64>().ok().filter(|s| *s > 0).map(Duration::from_secs)
}
