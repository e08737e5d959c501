//! gen_history.rs — vuelca a CSV el histórico inventado de una dirección
//!
//! Uso: gen_history "<dirección>" [hora] [día] [salida.csv]
//! Misma semilla y orden de sorteos que el dashboard: las filas coinciden con
//! las que ve el usuario (salvo las marcas de tiempo, relativas a "ahora").

use anyhow::{Context, Result};
use chrono::Local;
use std::{env, fs, path::Path};

use cityspot::models::types::{ContextInputs, DayOfWeek, Place, SignalCfg};
use cityspot::signal::synthesize;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let address = args.first().context("falta la dirección")?.clone();
    let hour: u8 = match args.get(1) {
        Some(h) => h.parse().context("hora inválida")?,
        None => 18,
    };
    let day: DayOfWeek = match args.get(2) {
        Some(d) => d.parse()?,
        None => DayOfWeek::Monday,
    };
    let out = args.get(3).cloned().unwrap_or_else(|| "data/history.csv".into());

    let inputs = ContextInputs { arrival_hour: hour, day, ..ContextInputs::default() };
    inputs.validate()?;

    // las coordenadas sólo desplazan las plazas cercanas, no afectan al histórico
    let place = Place { address: address.clone(), lat: 0.0, lon: 0.0 };
    let seeded = synthesize(&address, &place, &inputs, Local::now().naive_local(), &SignalCfg::default());

    if let Some(dir) = Path::new(&out).parent() {
        fs::create_dir_all(dir).ok();
    }
    let mut w = csv::Writer::from_path(&out).with_context(|| format!("no se pudo crear {out}"))?;
    w.write_record(["timestamp", "location", "sensor_id", "occupancy_recorded", "weather_condition"])?;
    for r in &seeded.history {
        w.write_record([
            r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.location.clone(),
            r.sensor_id.clone(),
            r.occupancy_recorded.to_string(),
            r.weather_condition.clone(),
        ])?;
    }
    w.flush()?;
    println!("OK -> {out} (base={}%, {} filas)", seeded.base.occupancy, seeded.history.len());
    Ok(())
}
