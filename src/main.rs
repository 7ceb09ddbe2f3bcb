mod config;
mod errors;
mod feeds;
mod models;
mod odds;
mod pricing;
mod ranking;
mod report;
mod scanner;
mod server;
mod state;

use crate::models::OutcomeEstimator;
use crate::scanner::OpportunityScanner;
use crate::state::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Structured logging on stderr so --once output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let once = std::env::args().skip(1).any(|a| a == "--once");

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        snapshot = %cfg.snapshot_path.display(),
        ml = cfg.thresholds.moneyline,
        spread = cfg.thresholds.spread,
        total = cfg.thresholds.total,
        prop = cfg.thresholds.prop,
        "ev_ranker starting"
    );

    let opportunity_scanner = Arc::new(OpportunityScanner::new(
        cfg.thresholds,
        OutcomeEstimator::heuristic(),
    ));

    if once {
        match scanner::cycle::run_cycle(&cfg, &opportunity_scanner).await {
            Ok(outcome) => {
                tracing::info!(
                    games = outcome.games,
                    props = outcome.props,
                    opportunities = outcome.ranked.len(),
                    "one-shot scan complete"
                );
                print!("{}", report::render_report(&outcome.ranked, cfg.top_n));
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "scan failed");
                std::process::exit(1);
            }
        }
    }

    let app_state = AppState::new(cfg.clone());

    // ── Spawn tasks ──

    // 1. Scan cycle (load -> parallel scan -> rank -> publish)
    let loop_state = app_state.clone();
    let loop_scanner = opportunity_scanner.clone();
    tokio::spawn(async move {
        scanner::cycle::run_scan_loop(loop_state, loop_scanner).await;
    });

    // 2. Axum HTTP + WS server
    let port = cfg.server_port;
    let app = axum::Router::new()
        .route("/api/bets", axum::routing::get(server::routes::get_bets))
        .route("/api/counters", axum::routing::get(server::routes::get_counters))
        .route("/api/health", axum::routing::get(server::routes::get_health))
        .route("/ws", axum::routing::get(server::ws::ws_handler))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(app_state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
