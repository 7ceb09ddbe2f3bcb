/// Raw odds text → `ParsedOdds`.
///
/// Accepted formats (as produced by the odds normalizer):
///   moneyline  "-150/+130"           home price / away price
///   spread     "-3.5 (-110)"         points, then price in parentheses
///   total      "O/U 220.5 (-105)"    marker, line, price
///
/// Every failure is an `Err`, never a panic or a silent zero. The scanner
/// treats any error here as "no opportunity for this market".
use super::{MoneylineSide, OverUnder, ParsedOdds, PropStat, SpreadSide};
use crate::errors::{EngineError, EngineResult};
use crate::pricing::ev::implied_probability;

/// Parse one American-odds token (`-110`, `+130`, `130`). Zero is rejected.
pub fn parse_american(token: &str) -> EngineResult<i32> {
    let token = token.trim();
    let odds = token
        .parse::<i32>()
        .map_err(|e| EngineError::Parse(format!("odds {token:?}: {e}")))?;
    if odds == 0 {
        return Err(EngineError::InvalidOdds(odds));
    }
    Ok(odds)
}

/// Moneyline: the side with the LOWER implied probability is recommended.
/// The market is assumed to overprice favorites, so the underdog is picked.
/// On equal prices the second (away) token wins.
pub fn parse_moneyline(text: &str) -> EngineResult<ParsedOdds> {
    let mut tokens = text.split('/').map(str::trim).filter(|t| !t.is_empty());
    let (home_token, away_token) = match (tokens.next(), tokens.next()) {
        (Some(h), Some(a)) => (h, a),
        _ => return Err(EngineError::Parse(format!("moneyline {text:?}: expected two prices"))),
    };

    let home_odds = parse_american(home_token)?;
    let away_odds = parse_american(away_token)?;
    let home_prob = implied_probability(home_odds)?;
    let away_prob = implied_probability(away_odds)?;

    let (favored_side, american_odds, implied) = if home_prob < away_prob {
        (MoneylineSide::Home, home_odds, home_prob)
    } else {
        (MoneylineSide::Away, away_odds, away_prob)
    };

    Ok(ParsedOdds::Moneyline {
        favored_side,
        american_odds,
        implied_probability: implied,
    })
}

/// Spread: `"<points> (<odds>)"`. Negative points mark the favorite.
pub fn parse_spread(text: &str) -> EngineResult<ParsedOdds> {
    let mut parts = text.split_whitespace();
    let points_token = parts
        .next()
        .ok_or_else(|| EngineError::Parse("spread: empty".into()))?;
    let odds_group = parts
        .next()
        .ok_or_else(|| EngineError::Parse(format!("spread {text:?}: missing odds group")))?;

    let points = parse_finite(points_token, "spread points")?;
    let american_odds = parse_american(parenthesized(odds_group, "spread", text)?)?;

    Ok(ParsedOdds::Spread {
        side: if points < 0.0 {
            SpreadSide::Favorite
        } else {
            SpreadSide::Underdog
        },
        points,
        american_odds,
        implied_probability: implied_probability(american_odds)?,
    })
}

/// Total: `"O/U <value> (<odds>)"`. The marker is checked case-insensitively
/// and the odds group must be parenthesized like a spread's. Over is picked when the quoted price
/// implies more than 50%, Under otherwise.
pub fn parse_total(text: &str) -> EngineResult<ParsedOdds> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(EngineError::Parse(format!(
            "total {text:?}: expected 3 tokens, got {}",
            parts.len()
        )));
    }

    if !parts[0].eq_ignore_ascii_case("O/U") {
        return Err(EngineError::Parse(format!("total {text:?}: expected O/U marker")));
    }

    let line_value = parse_finite(parts[1], "total line")?;
    let american_odds = parse_american(parenthesized(parts[2], "total", text)?)?;
    let implied = implied_probability(american_odds)?;

    Ok(ParsedOdds::Total {
        line_value,
        american_odds,
        pick: if implied > 0.5 {
            OverUnder::Over
        } else {
            OverUnder::Under
        },
        implied_probability: implied,
    })
}

/// Validate a player-prop row. A row needs a player, a finite line and at
/// least one nonzero side price; a zero price on one side drops only that side.
pub fn parse_prop(
    player: &str,
    stat_label: &str,
    line: Option<f64>,
    over_odds: Option<i32>,
    under_odds: Option<i32>,
) -> EngineResult<ParsedOdds> {
    let player = player.trim();
    if player.is_empty() {
        return Err(EngineError::Parse("prop: missing player".into()));
    }
    let line_value = match line {
        Some(l) if l.is_finite() => l,
        _ => return Err(EngineError::Parse(format!("prop {player}: missing line"))),
    };

    let over_odds = over_odds.filter(|&o| o != 0);
    let under_odds = under_odds.filter(|&o| o != 0);
    if over_odds.is_none() && under_odds.is_none() {
        return Err(EngineError::Parse(format!("prop {player}: no side prices")));
    }

    Ok(ParsedOdds::Prop {
        player: player.to_string(),
        stat_type: PropStat::from_label(stat_label),
        line_value,
        over_odds,
        under_odds,
    })
}

/// `"(-110)"` → `"-110"`. Both parentheses are required.
fn parenthesized<'a>(group: &'a str, market: &str, text: &str) -> EngineResult<&'a str> {
    group
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| EngineError::Parse(format!("{market} {text:?}: odds not parenthesized")))
}

fn parse_finite(token: &str, what: &str) -> EngineResult<f64> {
    let value = token
        .parse::<f64>()
        .map_err(|e| EngineError::Parse(format!("{what} {token:?}: {e}")))?;
    if !value.is_finite() {
        return Err(EngineError::Parse(format!("{what} {token:?}: not finite")));
    }
    Ok(value)
}
