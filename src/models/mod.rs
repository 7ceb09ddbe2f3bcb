pub mod heuristics;

use crate::errors::EngineResult;
use crate::odds::{BetKind, OverUnder, ParsedOdds, PropStat, Sport};
use std::collections::HashMap;

/// The slice of a parsed market an estimator needs. Props are estimated
/// one side at a time, so a prop `Market` carries the side and its price.
#[derive(Debug, Clone, Copy)]
pub enum Market<'a> {
    Moneyline { implied_probability: f64 },
    Spread { points: f64 },
    Total { pick: OverUnder },
    Prop {
        stat: &'a PropStat,
        side: OverUnder,
        american_odds: i32,
    },
}

impl<'a> Market<'a> {
    /// Game markets map one-to-one; props must go through `prop_side`.
    pub fn from_game_odds(odds: &ParsedOdds) -> Option<Self> {
        match odds {
            ParsedOdds::Moneyline {
                implied_probability,
                ..
            } => Some(Self::Moneyline {
                implied_probability: *implied_probability,
            }),
            ParsedOdds::Spread { points, .. } => Some(Self::Spread { points: *points }),
            ParsedOdds::Total { pick, .. } => Some(Self::Total { pick: *pick }),
            ParsedOdds::Prop { .. } => None,
        }
    }

    /// One side of a prop, if that side has a price.
    pub fn prop_side(odds: &'a ParsedOdds, side: OverUnder) -> Option<Self> {
        match odds {
            ParsedOdds::Prop {
                stat_type,
                over_odds,
                under_odds,
                ..
            } => {
                let price = match side {
                    OverUnder::Over => *over_odds,
                    OverUnder::Under => *under_odds,
                }?;
                Some(Self::Prop {
                    stat: stat_type,
                    side,
                    american_odds: price,
                })
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> BetKind {
        match self {
            Self::Moneyline { .. } => BetKind::Moneyline,
            Self::Spread { .. } => BetKind::Spread,
            Self::Total { .. } => BetKind::Total,
            Self::Prop { .. } => BetKind::Prop,
        }
    }
}

/// An estimator maps a market to a win probability in [0, 1].
/// Must be a pure function: deterministic output from inputs only.
pub type EstimateFn = fn(&Market<'_>) -> EngineResult<f64>;

/// Strategy table keyed by (sport, bet kind), with one default row per bet
/// kind for sports that have no specific entry.
#[derive(Clone)]
pub struct OutcomeEstimator {
    by_sport: HashMap<(Sport, BetKind), (&'static str, EstimateFn)>,
    defaults: HashMap<BetKind, (&'static str, EstimateFn)>,
}

impl OutcomeEstimator {
    pub fn empty() -> Self {
        Self {
            by_sport: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// The placeholder heuristic set. NBA and NFL currently share the same
    /// rules; they are registered per sport so either can diverge alone.
    pub fn heuristic() -> Self {
        let rows: [(BetKind, &'static str, EstimateFn); 4] = [
            (BetKind::Moneyline, "moneyline-contrarian", heuristics::moneyline_contrarian),
            (BetKind::Spread, "spread-key-number", heuristics::spread_key_number),
            (BetKind::Total, "total-over-bias", heuristics::total_over_bias),
            (BetKind::Prop, "prop-stat-adjusted", heuristics::prop_stat_adjusted),
        ];

        let mut estimator = Self::empty();
        for (kind, name, f) in rows {
            estimator.set_default(kind, name, f);
            for sport in [Sport::Nba, Sport::Nfl] {
                estimator.register(sport, kind, name, f);
            }
        }
        estimator
    }

    pub fn register(&mut self, sport: Sport, kind: BetKind, name: &'static str, f: EstimateFn) {
        self.by_sport.insert((sport, kind), (name, f));
    }

    pub fn set_default(&mut self, kind: BetKind, name: &'static str, f: EstimateFn) {
        self.defaults.insert(kind, (name, f));
    }

    /// `Ok(None)` when no estimator is registered for this sport and kind.
    pub fn estimate(&self, sport: Sport, market: &Market<'_>) -> EngineResult<Option<f64>> {
        match self.lookup(sport, market.kind()) {
            Some((_, f)) => f(market).map(Some),
            None => Ok(None),
        }
    }

    fn lookup(&self, sport: Sport, kind: BetKind) -> Option<(&'static str, EstimateFn)> {
        self.by_sport
            .get(&(sport, kind))
            .or_else(|| self.defaults.get(&kind))
            .copied()
    }
}

impl Default for OutcomeEstimator {
    fn default() -> Self {
        Self::heuristic()
    }
}
