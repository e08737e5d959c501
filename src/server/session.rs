//! session.rs
//!
//! Sesiones de visualización con feed en vivo.
//!
//! Cada sesión lanza una tarea con `tokio::time::interval` que recalcula el
//! panel y lo publica en un canal `watch` (gana el tick más reciente). Cerrar
//! la sesión, o que caduque por inactividad, aborta la tarea. El registro
//! admite como mucho `max` sesiones abiertas a la vez.

use rand::{rngs::StdRng, SeedableRng};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    sync::{watch, RwLock},
    task::JoinHandle,
    time::{interval, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::dashboard::{LiveContext, Services};
use crate::error::SessionLimit;
use crate::models::types::LivePanel;

pub struct LiveFeed {
    rx: watch::Receiver<LivePanel>,
    task: JoinHandle<()>,
    last_read: Instant,
}

impl LiveFeed {
    /// El primer panel ya viene calculado con el dashboard; el primer tick
    /// propio llega un periodo después.
    pub fn spawn(services: Arc<Services>, ctx: LiveContext, first: LivePanel, period: Duration) -> Self {
        let (tx, rx) = watch::channel(first);
        let task = tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            let mut n = 1u64;
            loop {
                ticker.tick().await;
                let panel = services.live_panel(&ctx, &mut rng, n).await;
                if tx.send(panel).is_err() {
                    break;
                }
                n += 1;
            }
        });
        Self { rx, task, last_read: Instant::now() }
    }

    pub fn latest(&mut self) -> LivePanel {
        self.last_read = Instant::now();
        self.rx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct SessionRegistry {
    next_id: AtomicU64,
    feeds: RwLock<HashMap<u64, LiveFeed>>,
    pub ttl: Duration,
    pub max: usize,
}

impl SessionRegistry {
    pub fn new(ttl: Duration, max: usize) -> Self {
        Self { next_id: AtomicU64::new(1), feeds: RwLock::new(HashMap::new()), ttl, max }
    }

    pub async fn open(&self, services: Arc<Services>, ctx: LiveContext, first: LivePanel) -> Result<u64, SessionLimit> {
        let mut feeds = self.feeds.write().await;
        if feeds.len() >= self.max {
            warn!("sesión rechazada: {} abiertas", feeds.len());
            return Err(SessionLimit(self.max));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let period = services.cfg.refresh;
        feeds.insert(id, LiveFeed::spawn(services, ctx, first, period));
        info!("sesión {id} abierta (refresco cada {period:?})");
        Ok(id)
    }

    pub async fn latest(&self, id: u64) -> Option<LivePanel> {
        let mut feeds = self.feeds.write().await;
        feeds.get_mut(&id).map(|f| f.latest())
    }

    /// `false` si la sesión no existía.
    pub async fn close(&self, id: u64) -> bool {
        let removed = self.feeds.write().await.remove(&id);
        if removed.is_some() {
            info!("sesión {id} cerrada");
        }
        removed.is_some()
    }

    pub async fn len(&self) -> usize {
        self.feeds.read().await.len()
    }

    /// Elimina sesiones sin lecturas durante más de `ttl`.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut feeds = self.feeds.write().await;
        let before = feeds.len();
        feeds.retain(|_, f| now.duration_since(f.last_read) <= self.ttl && f.is_running());
        let expired = before - feeds.len();
        if expired > 0 {
            debug!("{expired} sesiones caducadas");
        }
        expired
    }
}

/// Barrido periódico de sesiones caducadas.
pub async fn sweep_loop(registry: Arc<SessionRegistry>) {
    let mut ticker = interval((registry.ttl / 4).max(Duration::from_secs(1)));
    loop {
        ticker.tick().await;
        registry.sweep().await;
    }
}
