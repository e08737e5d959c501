//! fetch.rs
//! Cliente HTTP compartido y GET de JSON con timeout por petición.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::types::AppCfg;

/// Cliente con compresión y User-Agent propio (Nominatim lo exige).
pub fn build_client(cfg: &AppCfg) -> Result<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.clone())
        .brotli(true)
        .gzip(true)
        .deflate(true)
        .build()
        .context("No se pudo construir el cliente HTTP")
}

pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<T, ProviderError> {
    let resp = client.get(url).query(query).timeout(timeout).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    debug!("GET {url} -> {status}");
    Ok(resp.json::<T>().await?)
}
