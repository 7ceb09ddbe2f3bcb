/// American-odds pricing: implied probability and expected value.
///
/// implied(o) = 100 / (o + 100)        for o > 0
///            = |o| / (|o| + 100)      for o < 0
///
/// EV(o, p)   = (o / 100) * p - (1 - p)        for o > 0
///            = p - (|o| / 100) * (1 - p)      for o < 0
///
/// EV is profit per unit staked. o = 0 has no meaning in American notation
/// and is rejected. Pure functions, no side effects, no allocations.
use crate::errors::{EngineError, EngineResult};

/// Win probability encoded by an American price, ignoring bookmaker margin.
/// Always in (0, 1) for nonzero odds.
#[inline]
pub fn implied_probability(american_odds: i32) -> EngineResult<f64> {
    if american_odds == 0 {
        return Err(EngineError::InvalidOdds(american_odds));
    }
    let o = f64::from(american_odds);
    if american_odds > 0 {
        Ok(100.0 / (o + 100.0))
    } else {
        let abs = o.abs();
        Ok(abs / (abs + 100.0))
    }
}

/// Expected profit per unit staked at `american_odds` given a true win probability.
///
/// `win_probability` must lie in [0, 1]; anything else (including NaN) is
/// rejected rather than clamped so a bad estimate never turns into a ranking.
#[inline]
pub fn expected_value(american_odds: i32, win_probability: f64) -> EngineResult<f64> {
    if american_odds == 0 {
        return Err(EngineError::InvalidOdds(american_odds));
    }
    if !(0.0..=1.0).contains(&win_probability) {
        return Err(EngineError::InvalidProbability(win_probability));
    }
    let p = win_probability;
    let o = f64::from(american_odds);
    if american_odds > 0 {
        Ok((o / 100.0) * p - (1.0 - p))
    } else {
        Ok(p - (o.abs() / 100.0) * (1.0 - p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_probability_values() {
        let plus = implied_probability(130).unwrap();
        assert!((plus - 100.0 / 230.0).abs() < 1e-12);
        let minus = implied_probability(-150).unwrap();
        assert!((minus - 0.6).abs() < 1e-12);
        let even = implied_probability(100).unwrap();
        assert!((even - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_implied_probability_open_interval() {
        for o in [-100_000, -10_000, -1000, -110, -101, -100, -1, 1, 99, 100, 101, 450, 100_000] {
            let p = implied_probability(o).unwrap();
            assert!(p > 0.0 && p < 1.0, "implied({o}) = {p} outside (0,1)");
        }
    }

    #[test]
    fn test_implied_probability_sign_branches() {
        // each sign takes its own branch: +150 is the underdog, -150 the favorite
        let dog = implied_probability(150).unwrap();
        let fav = implied_probability(-150).unwrap();
        assert!((dog - 0.4).abs() < 1e-12);
        assert!((fav - 0.6).abs() < 1e-12);
        assert!((implied_probability(-100).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_odds_rejected() {
        assert!(matches!(implied_probability(0), Err(EngineError::InvalidOdds(0))));
        assert!(matches!(expected_value(0, 0.5), Err(EngineError::InvalidOdds(0))));
    }

    #[test]
    fn test_expected_value_values() {
        // +130 at the contrarian estimate 1 - 100/230
        let p = 1.0 - 100.0 / 230.0;
        let ev = expected_value(130, p).unwrap();
        assert!((ev - (1.3 * p - (1.0 - p))).abs() < 1e-12);
        assert!((ev - 0.3).abs() < 1e-9, "ev = {ev}");

        // -110 at 0.55
        let ev = expected_value(-110, 0.55).unwrap();
        assert!((ev - (0.55 - 1.1 * 0.45)).abs() < 1e-12);
    }

    #[test]
    fn test_expected_value_fair_price_is_zero() {
        let p = implied_probability(-150).unwrap();
        let ev = expected_value(-150, p).unwrap();
        assert!(ev.abs() < 1e-12, "fair price EV should be 0: {ev}");
    }

    #[test]
    fn test_expected_value_monotonic_in_probability() {
        for o in [-400, -150, -110, 105, 130, 350] {
            let mut prev = f64::NEG_INFINITY;
            for i in 0..=100 {
                let p = i as f64 / 100.0;
                let ev = expected_value(o, p).unwrap();
                assert!(ev > prev, "EV not increasing at o={o}, p={p}");
                prev = ev;
            }
        }
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        assert!(matches!(expected_value(-110, 1.01), Err(EngineError::InvalidProbability(_))));
        assert!(matches!(expected_value(-110, -0.01), Err(EngineError::InvalidProbability(_))));
        assert!(matches!(expected_value(120, f64::NAN), Err(EngineError::InvalidProbability(_))));
        assert!(expected_value(120, 0.0).is_ok());
        assert!(expected_value(120, 1.0).is_ok());
    }
}
