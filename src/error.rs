//! error.rs
//! Errores tipados del servicio.
//!
//! - `ProviderError`: fallo de un proveedor externo (geocoder o clima).
//!   Los adaptadores no lo propagan: lo adjuntan al valor de reserva
//!   (`Sourced::Fallback`) y quien llama lo registra.
//! - `ValidationError`: entradas fuera de rango, se responde 400.
//! - `SessionLimit`: tope de sesiones abiertas alcanzado, se responde 429.
//!
//! Cualquier otro fallo viaja como `anyhow::Error` hasta la API.

use std::fmt;

#[derive(Debug)]
pub enum ProviderError {
    /// No hubo respuesta a tiempo
    Timeout,
    /// Error de red/conexión
    Transport(reqwest::Error),
    /// Respuesta HTTP no exitosa
    Status(u16),
    /// Cuerpo ilegible o incompleto
    Decode(String),
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Timeout => write!(f, "provider timed out"),
            ProviderError::Transport(e) => write!(f, "provider unreachable: {}", e),
            ProviderError::Status(s) => write!(f, "provider returned HTTP {}", s),
            ProviderError::Decode(msg) => write!(f, "malformed provider response: {}", msg),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Status(status.as_u16())
        } else {
            ProviderError::Transport(err)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    HourOutOfRange(u8),
    DurationOutOfRange(u32),
    UnknownDay(String),
    UnknownVehicle(String),
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::HourOutOfRange(h) => write!(f, "arrival hour {} outside 0..=23", h),
            ValidationError::DurationOutOfRange(d) => write!(f, "duration {}h outside 1..=12", d),
            ValidationError::UnknownDay(s) => write!(f, "unknown day of week '{}'", s),
            ValidationError::UnknownVehicle(s) => write!(f, "unknown vehicle type '{}'", s),
        }
    }
}

/// No se abren más sesiones hasta que se cierre o caduque alguna.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimit(pub usize);

impl std::error::Error for SessionLimit {}

impl fmt::Display for SessionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "too many open sessions (limit {})", self.0)
    }
}
