pub mod cycle;
pub mod opportunity;

use crate::config::EvThresholds;
use crate::errors::EngineResult;
use crate::feeds::snapshot::{GameRecord, PropRecord, ScanRow, Snapshot};
use crate::models::{Market, OutcomeEstimator};
use crate::odds::parser;
use crate::odds::{BetKind, GameContext, OverUnder, ParsedOdds, Sport};
use crate::pricing::ev;
use opportunity::{BetType, BettingOpportunity};
use smallvec::SmallVec;
use std::sync::Arc;

/// Turns snapshot rows into opportunities.
///
/// Per game, moneyline / spread / total are parsed and evaluated
/// independently; per prop row, Over and Under are evaluated independently.
/// An opportunity is emitted only when EV strictly exceeds the threshold for
/// its bet type. A row that fails to parse or estimate is skipped; nothing
/// here aborts the rest of the scan.
pub struct OpportunityScanner {
    thresholds: EvThresholds,
    estimator: OutcomeEstimator,
}

impl OpportunityScanner {
    pub fn new(thresholds: EvThresholds, estimator: OutcomeEstimator) -> Self {
        Self {
            thresholds,
            estimator,
        }
    }

    #[inline]
    fn threshold(&self, kind: BetKind) -> f64 {
        match kind {
            BetKind::Moneyline => self.thresholds.moneyline,
            BetKind::Spread => self.thresholds.spread,
            BetKind::Total => self.thresholds.total,
            BetKind::Prop => self.thresholds.prop,
        }
    }

    /// Sequential scan. Output order: slate by slate, games before props,
    /// and within a game moneyline, spread, total.
    pub fn scan(&self, snapshot: &Snapshot) -> Vec<BettingOpportunity> {
        let mut out = Vec::new();
        for slate in &snapshot.slates {
            for game in &slate.games {
                let ctx = game.context(slate.sport);
                out.extend(self.scan_game(&ctx, game));
            }
            for prop in &slate.props {
                out.extend(self.scan_prop(slate.sport, prop));
            }
        }
        out
    }

    pub fn scan_rows(&self, rows: &[ScanRow]) -> Vec<BettingOpportunity> {
        let mut out = Vec::new();
        for row in rows {
            match row {
                ScanRow::Game(sport, game) => {
                    let ctx = game.context(*sport);
                    out.extend(self.scan_game(&ctx, game));
                }
                ScanRow::Prop(sport, prop) => out.extend(self.scan_prop(*sport, prop)),
            }
        }
        out
    }

    pub fn scan_game(
        &self,
        ctx: &GameContext,
        game: &GameRecord,
    ) -> SmallVec<[BettingOpportunity; 3]> {
        let markets: [(&str, Option<&str>, fn(&str) -> EngineResult<ParsedOdds>); 3] = [
            ("moneyline", raw(&game.moneyline), parser::parse_moneyline),
            ("spread", raw(&game.spread), parser::parse_spread),
            ("total", raw(&game.total), parser::parse_total),
        ];

        let mut out = SmallVec::new();
        for (name, text, parse) in markets {
            let Some(text) = text else {
                continue;
            };
            let result = parse(text).and_then(|odds| self.evaluate_game_market(ctx, &odds));
            match result {
                Ok(Some(opp)) => out.push(opp),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        matchup = %ctx.matchup(),
                        market = name,
                        raw = text,
                        error = %e,
                        "skipping market"
                    );
                }
            }
        }
        out
    }

    pub fn scan_prop(&self, sport: Sport, prop: &PropRecord) -> SmallVec<[BettingOpportunity; 2]> {
        let mut out = SmallVec::new();

        let parsed = match parser::parse_prop(
            &prop.player,
            &prop.stat_type,
            prop.line,
            prop.over,
            prop.under,
        ) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(game = %prop.game, player = %prop.player, error = %e, "skipping prop row");
                return out;
            }
        };

        for side in [OverUnder::Over, OverUnder::Under] {
            match self.evaluate_prop_side(sport, prop, &parsed, side) {
                Ok(Some(opp)) => out.push(opp),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        game = %prop.game,
                        player = %prop.player,
                        side = %side,
                        error = %e,
                        "skipping prop side"
                    );
                }
            }
        }
        out
    }

    /// `Some((probability, ev))` when the market clears its threshold.
    fn qualify(&self, sport: Sport, market: &Market<'_>, american_odds: i32) -> EngineResult<Option<(f64, f64)>> {
        let Some(probability) = self.estimator.estimate(sport, market)? else {
            return Ok(None);
        };
        let ev = ev::expected_value(american_odds, probability)?;
        if ev > self.threshold(market.kind()) {
            Ok(Some((probability, ev)))
        } else {
            Ok(None)
        }
    }

    fn evaluate_game_market(
        &self,
        ctx: &GameContext,
        odds: &ParsedOdds,
    ) -> EngineResult<Option<BettingOpportunity>> {
        let (Some(market), Some(american_odds)) = (Market::from_game_odds(odds), odds.american_odds()) else {
            return Ok(None);
        };
        let Some((probability, ev)) = self.qualify(ctx.sport, &market, american_odds)? else {
            return Ok(None);
        };

        let (bet_type, line, pick, rationale) = match odds {
            ParsedOdds::Moneyline { favored_side, .. } => {
                let team = ctx.team(*favored_side);
                (
                    BetType::Moneyline,
                    None,
                    format!("{team} {american_odds:+}"),
                    format!(
                        "Strong value on {team} ML ({american_odds:+}) - {} win probability",
                        pct(probability)
                    ),
                )
            }
            ParsedOdds::Spread { side, points, .. } => {
                let points_text = line_text(*points);
                (
                    BetType::Spread,
                    Some(*points),
                    format!("{side} {points_text}"),
                    format!(
                        "Strong spread value on {side} {points_text} ({american_odds:+}) - {} cover probability",
                        pct(probability)
                    ),
                )
            }
            ParsedOdds::Total {
                line_value, pick, ..
            } => {
                let line = line_text(*line_value);
                (
                    BetType::Total,
                    Some(*line_value),
                    format!("{pick} {line}"),
                    format!(
                        "Strong value on {pick} {line} ({american_odds:+}) - {} probability",
                        pct(probability)
                    ),
                )
            }
            ParsedOdds::Prop { .. } => return Ok(None),
        };

        Ok(Some(BettingOpportunity {
            sport: ctx.sport,
            scheduled_time: ctx.scheduled_time.clone(),
            matchup: ctx.matchup(),
            bet_type,
            pick,
            line,
            american_odds,
            estimated_probability: probability,
            expected_value: ev,
            rationale,
        }))
    }

    fn evaluate_prop_side(
        &self,
        sport: Sport,
        prop: &PropRecord,
        parsed: &ParsedOdds,
        side: OverUnder,
    ) -> EngineResult<Option<BettingOpportunity>> {
        let ParsedOdds::Prop {
            player,
            stat_type,
            line_value,
            ..
        } = parsed
        else {
            return Ok(None);
        };
        let Some(market) = Market::prop_side(parsed, side) else {
            return Ok(None);
        };
        let Market::Prop { american_odds, .. } = market else {
            return Ok(None);
        };
        let Some((probability, ev)) = self.qualify(sport, &market, american_odds)? else {
            return Ok(None);
        };

        let line = line_text(*line_value);
        Ok(Some(BettingOpportunity {
            sport,
            scheduled_time: prop.time.clone(),
            matchup: prop.game.clone(),
            bet_type: BetType::PlayerProp(stat_type.clone()),
            pick: format!("{player} {side} {line}"),
            line: Some(*line_value),
            american_odds,
            estimated_probability: probability,
            expected_value: ev,
            rationale: format!(
                "Strong value on {player} {side} {line} {stat_type} ({american_odds:+}) - {} probability",
                pct(probability)
            ),
        }))
    }
}

/// Fan rows out over blocking worker threads, then join every chunk in
/// spawn order. Ranking must not start before the last chunk is back, and
/// joining in order keeps the output identical to `OpportunityScanner::scan`.
pub async fn scan_parallel(
    scanner: Arc<OpportunityScanner>,
    snapshot: &Snapshot,
    workers: usize,
) -> EngineResult<Vec<BettingOpportunity>> {
    if snapshot.is_empty() {
        return Ok(Vec::new());
    }
    let rows = snapshot.rows();
    let chunk_size = rows.len().div_ceil(workers.max(1));

    let mut handles = Vec::with_capacity(workers);
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<ScanRow> = rows.by_ref().take(chunk_size).collect();
        let scanner = Arc::clone(&scanner);
        handles.push(tokio::task::spawn_blocking(move || scanner.scan_rows(&chunk)));
    }

    let mut out = Vec::new();
    for handle in handles {
        out.extend(handle.await?);
    }
    Ok(out)
}

/// Empty or whitespace-only provider text counts as absent.
fn raw(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Lines always carry a decimal: 7 → "7.0", 3.5 → "3.5".
fn line_text(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}
