//! main.rs — Servicio CitySpot: geocoder + clima + señal sintética + feed en vivo

use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cityspot::models::types::AppCfg;
use cityspot::server::{
    api::{self, ApiState},
    dashboard::Services,
    fetch,
    session::{self, SessionRegistry},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs (RUST_LOG manda; por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppCfg::from_env();
    info!(
        "geocoder={} clima={} refresco={:?}",
        cfg.geocoder_url, cfg.weather_url, cfg.refresh
    );

    // HTTP client con compresion, compartido por ambos proveedores
    let client = fetch::build_client(&cfg)?;
    let bind = cfg.bind.clone();
    let sessions = Arc::new(SessionRegistry::new(cfg.session_ttl, cfg.max_sessions));
    let services = Arc::new(Services::new(client, cfg));

    // Barrido de sesiones caducadas
    {
        let sessions_c = sessions.clone();
        tokio::spawn(async move { session::sweep_loop(sessions_c).await; });
    }

    // API
    let app = api::router(ApiState { services, sessions });
    info!("Escuchando en http://{}", bind);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}
