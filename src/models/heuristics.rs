/// Placeholder outcome heuristics.
///
/// None of these are statistically validated. They are fixed rules that
/// decide "recommend" vs "pass" deterministically until a trained model
/// replaces them, so the constants are part of the observable behaviour.
use super::Market;
use crate::errors::{EngineError, EngineResult};
use crate::odds::{OverUnder, PropStat};
use crate::pricing::ev::implied_probability;

pub const SPREAD_KEY_NUMBER: f64 = 7.0;
pub const SPREAD_INSIDE_KEY: f64 = 0.55;
pub const SPREAD_OUTSIDE_KEY: f64 = 0.45;

pub const TOTAL_OVER: f64 = 0.52;
pub const TOTAL_UNDER: f64 = 0.48;

pub const PROP_MIN_PROBABILITY: f64 = 0.35;
pub const PROP_MAX_PROBABILITY: f64 = 0.75;

/// Contrarian: the market's own price for the chosen side, inverted.
pub fn moneyline_contrarian(market: &Market<'_>) -> EngineResult<f64> {
    match market {
        Market::Moneyline { implied_probability } => Ok(1.0 - implied_probability),
        other => Err(mismatch("moneyline", other)),
    }
}

/// Short spreads cover more often than long ones.
pub fn spread_key_number(market: &Market<'_>) -> EngineResult<f64> {
    match market {
        Market::Spread { points } => Ok(if points.abs() < SPREAD_KEY_NUMBER {
            SPREAD_INSIDE_KEY
        } else {
            SPREAD_OUTSIDE_KEY
        }),
        other => Err(mismatch("spread", other)),
    }
}

pub fn total_over_bias(market: &Market<'_>) -> EngineResult<f64> {
    match market {
        Market::Total { pick: OverUnder::Over } => Ok(TOTAL_OVER),
        Market::Total { pick: OverUnder::Under } => Ok(TOTAL_UNDER),
        other => Err(mismatch("total", other)),
    }
}

/// Offered side's implied probability scaled per stat type, clamped to
/// [0.35, 0.75].
pub fn prop_stat_adjusted(market: &Market<'_>) -> EngineResult<f64> {
    match market {
        Market::Prop {
            stat,
            side,
            american_odds,
        } => {
            let base = implied_probability(*american_odds)?;
            let adjusted = base * prop_multiplier(stat, *side);
            Ok(adjusted.clamp(PROP_MIN_PROBABILITY, PROP_MAX_PROBABILITY))
        }
        other => Err(mismatch("prop", other)),
    }
}

/// (Over, Under) multipliers per stat type.
#[inline]
pub fn prop_multiplier(stat: &PropStat, side: OverUnder) -> f64 {
    let (over, under) = match stat {
        PropStat::Points => (1.05, 0.95),
        PropStat::Rebounds => (1.02, 0.98),
        PropStat::Assists => (1.01, 0.99),
        PropStat::PassTds => (1.03, 0.97),
        PropStat::Receptions => (1.01, 0.99),
        PropStat::Other(_) => (1.0, 1.0),
    };
    match side {
        OverUnder::Over => over,
        OverUnder::Under => under,
    }
}

fn mismatch(expected: &str, got: &Market<'_>) -> EngineError {
    EngineError::Model(format!("{expected} estimator received {:?} market", got.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moneyline_contrarian() {
        let p = moneyline_contrarian(&Market::Moneyline {
            implied_probability: 100.0 / 230.0,
        })
        .unwrap();
        assert!((p - 130.0 / 230.0).abs() < 1e-12);
    }

    #[test]
    fn test_spread_constants() {
        assert_eq!(spread_key_number(&Market::Spread { points: -3.5 }).unwrap(), 0.55);
        assert_eq!(spread_key_number(&Market::Spread { points: 6.5 }).unwrap(), 0.55);
        assert_eq!(spread_key_number(&Market::Spread { points: -7.0 }).unwrap(), 0.45);
        assert_eq!(spread_key_number(&Market::Spread { points: 10.5 }).unwrap(), 0.45);
    }

    #[test]
    fn test_total_constants() {
        assert_eq!(total_over_bias(&Market::Total { pick: OverUnder::Over }).unwrap(), 0.52);
        assert_eq!(total_over_bias(&Market::Total { pick: OverUnder::Under }).unwrap(), 0.48);
    }

    #[test]
    fn test_prop_points_over_unclamped() {
        let stat = PropStat::Points;
        let p = prop_stat_adjusted(&Market::Prop {
            stat: &stat,
            side: OverUnder::Over,
            american_odds: -120,
        })
        .unwrap();
        let expected = (120.0 / 220.0) * 1.05;
        assert!((p - expected).abs() < 1e-12);
        assert!((p - 0.5727).abs() < 1e-4, "p = {p}");
    }

    #[test]
    fn test_prop_multipliers() {
        let cases = [
            (PropStat::Points, 1.05, 0.95),
            (PropStat::Rebounds, 1.02, 0.98),
            (PropStat::Assists, 1.01, 0.99),
            (PropStat::PassTds, 1.03, 0.97),
            (PropStat::Receptions, 1.01, 0.99),
            (PropStat::Other("Steals".into()), 1.0, 1.0),
        ];
        for (stat, over, under) in cases {
            assert_eq!(prop_multiplier(&stat, OverUnder::Over), over, "{stat}");
            assert_eq!(prop_multiplier(&stat, OverUnder::Under), under, "{stat}");
        }
    }

    #[test]
    fn test_prop_clamped() {
        let stat = PropStat::Points;
        // +300 implies 0.25, * 0.95 → clamped up to 0.35
        let low = prop_stat_adjusted(&Market::Prop {
            stat: &stat,
            side: OverUnder::Under,
            american_odds: 300,
        })
        .unwrap();
        assert_eq!(low, 0.35);
        // -400 implies 0.8, * 1.05 → clamped down to 0.75
        let high = prop_stat_adjusted(&Market::Prop {
            stat: &stat,
            side: OverUnder::Over,
            american_odds: -400,
        })
        .unwrap();
        assert_eq!(high, 0.75);
    }

    #[test]
    fn test_mismatched_market_rejected() {
        let err = spread_key_number(&Market::Total { pick: OverUnder::Over });
        assert!(matches!(err, Err(EngineError::Model(_))));
    }
}
