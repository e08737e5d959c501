//! geocoder.rs
//!
//! Adaptador del geocodificador (API de búsqueda compatible con Nominatim).
//!
//! - `suggest()`: hasta N direcciones para el autocompletado; ante cualquier
//!   fallo devuelve lista vacía como valor de reserva, con la causa adjunta
//! - `resolve()`: primera coincidencia o `None`; aquí los fallos sí se propagan

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::fetch::get_json;
use crate::error::ProviderError;
use crate::models::types::{AppCfg, Place, Sourced, Suggestion};

/// Nominatim devuelve lat/lon como texto; otros servicios compatibles, como número.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coord {
    Num(f64),
    Text(String),
}

impl Coord {
    fn value(&self) -> Result<f64, ProviderError> {
        match self {
            Coord::Num(v) => Ok(*v),
            Coord::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ProviderError::Decode(format!("coordenada inválida '{s}'"))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: Coord,
    lon: Coord,
}

#[derive(Clone)]
pub struct GeocoderClient {
    pub(crate) http: Client,
    /// Endpoint base, p.ej: "https://nominatim.openstreetmap.org"
    pub base_url: String,
    pub timeout: Duration,
    pub max_suggestions: usize,
}

impl GeocoderClient {
    pub fn new(http: Client, cfg: &AppCfg) -> Self {
        Self {
            http,
            base_url: cfg.geocoder_url.trim_end_matches('/').to_string(),
            timeout: cfg.geocoder_timeout,
            max_suggestions: cfg.max_suggestions,
        }
    }

    async fn search(&self, q: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let query = [("q", q.to_string()), ("format", "json".to_string()), ("limit", limit.to_string())];
        get_json(&self.http, &url, &query, self.timeout).await
    }

    pub async fn suggest(&self, query: &str) -> Sourced<Vec<Suggestion>> {
        if query.trim().is_empty() {
            return Sourced::Live(Vec::new());
        }
        match self.search(query, self.max_suggestions).await {
            Ok(hits) => Sourced::Live(
                hits.into_iter()
                    .take(self.max_suggestions)
                    .map(|h| Suggestion { label: h.display_name.clone(), value: h.display_name })
                    .collect(),
            ),
            Err(reason) => Sourced::Fallback { value: Vec::new(), reason },
        }
    }

    pub async fn resolve(&self, address: &str) -> Result<Option<Place>, ProviderError> {
        let hits = self.search(address, 1).await?;
        let Some(hit) = hits.into_iter().next() else { return Ok(None) };
        Ok(Some(Place { lat: hit.lat.value()?, lon: hit.lon.value()?, address: hit.display_name }))
    }
}
