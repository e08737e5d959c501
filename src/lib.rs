//! cityspot — disponibilidad de aparcamiento simulada.
//!
//! `signal` genera las cifras (deterministas por dirección/hora/día),
//! `server` contiene los adaptadores HTTP, el flujo del dashboard, las
//! sesiones con feed en vivo y las rutas Axum.

pub mod error;
pub mod models;
pub mod server;
pub mod signal;
