use super::{scan_parallel, OpportunityScanner};
use crate::config::AppConfig;
use crate::errors::EngineResult;
use crate::feeds::snapshot;
use crate::ranking::{self, RankedOpportunityList};
use crate::state::{AppState, WsMessage};
use chrono::Utc;
use portable_atomic::Ordering;
use std::sync::Arc;

/// Result of one load → scan → rank pass.
#[derive(Debug)]
pub struct CycleOutcome {
    pub ranked: RankedOpportunityList,
    pub games: usize,
    pub props: usize,
}

/// Runs one cycle against the snapshot at `config.snapshot_path`.
/// Every cycle starts from a fresh snapshot; nothing carries over.
pub async fn run_cycle(
    config: &AppConfig,
    scanner: &Arc<OpportunityScanner>,
) -> EngineResult<CycleOutcome> {
    let now = Utc::now();
    let path = config.snapshot_path.clone();
    let snapshot = tokio::task::spawn_blocking(move || snapshot::load_snapshot(&path, now)).await??;

    let opportunities = scan_parallel(Arc::clone(scanner), &snapshot, config.scan_workers).await?;
    let ranked = ranking::rank(opportunities).with_timestamp(now);

    Ok(CycleOutcome {
        ranked,
        games: snapshot.game_count(),
        props: snapshot.prop_count(),
    })
}

/// Periodic scan loop. Publishes each ranking to the watch channel and WS
/// clients. A failed cycle keeps the previous ranking published.
pub async fn run_scan_loop(state: Arc<AppState>, scanner: Arc<OpportunityScanner>) {
    tracing::info!(
        path = %state.config.snapshot_path.display(),
        interval_secs = state.config.scan_interval_secs,
        workers = state.config.scan_workers,
        "scan loop started"
    );

    let mut interval =
        tokio::time::interval(tokio::time::Duration::from_secs(state.config.scan_interval_secs));
    let mut consecutive_errors: u32 = 0;

    loop {
        interval.tick().await;

        match run_cycle(&state.config, &scanner).await {
            Ok(outcome) => {
                consecutive_errors = 0;
                state.counters.cycles_completed.fetch_add(1, Ordering::Relaxed);
                state
                    .counters
                    .games_scanned
                    .fetch_add(outcome.games as u64, Ordering::Relaxed);
                state
                    .counters
                    .props_scanned
                    .fetch_add(outcome.props as u64, Ordering::Relaxed);

                tracing::info!(
                    games = outcome.games,
                    props = outcome.props,
                    opportunities = outcome.ranked.len(),
                    best_ev = ?outcome.ranked.best_ev(),
                    "scan cycle complete"
                );
                state.publish(outcome.ranked);
            }
            Err(e) => {
                consecutive_errors += 1;
                state.counters.cycle_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    error = %e,
                    consecutive = consecutive_errors,
                    "scan cycle failed"
                );
                state.broadcast(WsMessage::CycleFailed {
                    reason: e.to_string(),
                    consecutive: consecutive_errors,
                });
            }
        }
    }
}
