use crate::ranking::RankedOpportunityList;
use crate::scanner::opportunity::BettingOpportunity;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct BetsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BetsResponse {
    pub generated_at: Option<String>,
    pub total: usize,
    pub bets: Vec<BettingOpportunity>,
}

impl BetsResponse {
    pub fn from_ranking(ranked: &RankedOpportunityList, limit: usize) -> Self {
        Self {
            generated_at: ranked.generated_at.clone(),
            total: ranked.len(),
            bets: ranked.top(limit).to_vec(),
        }
    }
}

/// GET /api/bets -- latest ranking (from watch channel, no lock)
pub async fn get_bets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BetsQuery>,
) -> Json<BetsResponse> {
    let limit = params.limit.unwrap_or(state.config.top_n).min(500);
    let ranked = state.ranked_rx.borrow();
    Json(BetsResponse::from_ranking(&ranked, limit))
}

/// GET /api/health
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    let ranked = state.ranked_rx.borrow();
    Json(serde_json::json!({
        "status": "ok",
        "generated_at": ranked.generated_at,
        "cycles_completed": state.counters.cycles_completed.load(Relaxed),
    }))
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    Json(serde_json::json!({
        "cycles_completed": state.counters.cycles_completed.load(Relaxed),
        "cycle_errors": state.counters.cycle_errors.load(Relaxed),
        "games_scanned": state.counters.games_scanned.load(Relaxed),
        "props_scanned": state.counters.props_scanned.load(Relaxed),
        "opportunities_ranked": state.counters.opportunities_ranked.load(Relaxed),
        "ws_messages_sent": state.counters.ws_messages_sent.load(Relaxed),
    }))
}
