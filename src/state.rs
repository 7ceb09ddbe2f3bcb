use crate::config::AppConfig;
use crate::ranking::RankedOpportunityList;
use crate::scanner::opportunity::BettingOpportunity;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

// ── Messages OUT of the engine ──

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    #[serde(rename = "ranking_update")]
    RankingUpdate {
        generated_at: Option<String>,
        count: usize,
        best_ev: Option<f64>,
        top: Vec<BettingOpportunity>,
    },

    #[serde(rename = "cycle_failed")]
    CycleFailed { reason: String, consecutive: u32 },
}

// ── Performance Counters (lock-free) ──

pub struct PerfCounters {
    pub cycles_completed: AtomicU64,
    pub cycle_errors: AtomicU64,
    pub games_scanned: AtomicU64,
    pub props_scanned: AtomicU64,
    pub opportunities_ranked: AtomicU64,
    pub ws_messages_sent: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            cycles_completed: AtomicU64::new(0),
            cycle_errors: AtomicU64::new(0),
            games_scanned: AtomicU64::new(0),
            props_scanned: AtomicU64::new(0),
            opportunities_ranked: AtomicU64::new(0),
            ws_messages_sent: AtomicU64::new(0),
        }
    }
}

// ── Application shared state (channels, not locks) ──

pub struct AppState {
    pub config: AppConfig,

    // Scan cycle -> API: latest ranking (watch = single producer, multi consumer)
    pub ranked_tx: watch::Sender<RankedOpportunityList>,
    pub ranked_rx: watch::Receiver<RankedOpportunityList>,

    // Scan cycle -> WS clients
    pub ws_tx: broadcast::Sender<WsMessage>,

    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let (ws_tx, _) = broadcast::channel(256);
        let (ranked_tx, ranked_rx) = watch::channel(RankedOpportunityList::default());

        Arc::new(Self {
            config,
            ranked_tx,
            ranked_rx,
            ws_tx,
            counters: PerfCounters::new(),
        })
    }

    /// Replace the published ranking and notify WS clients.
    pub fn publish(&self, ranked: RankedOpportunityList) {
        let update = WsMessage::RankingUpdate {
            generated_at: ranked.generated_at.clone(),
            count: ranked.len(),
            best_ev: ranked.best_ev(),
            top: ranked.top(self.config.top_n).to_vec(),
        };
        self.counters
            .opportunities_ranked
            .store(ranked.len() as u64, Ordering::Relaxed);
        let _ = self.ranked_tx.send(ranked);
        self.broadcast(update);
    }

    #[inline]
    pub fn broadcast(&self, msg: WsMessage) {
        self.counters.ws_messages_sent.fetch_add(1, Ordering::Relaxed);
        let _ = self.ws_tx.send(msg);
    }
}
