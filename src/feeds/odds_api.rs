/// Normalizes The-Odds-API event payloads into the raw odds lines the
/// parser consumes. No network access here: the fetcher hands over the
/// decoded JSON and this module only reshapes it.
///
/// Conventions fixed here:
///   - only the first bookmaker of each event is used for game lines
///   - games that already started (commence_time < now) are dropped
///   - moneyline text is "<home price>/<away price>"
///   - spread text uses the favorite (lowest point) outcome
///   - total text uses the Over outcome
///   - display times are Eastern Standard (UTC-5), e.g. "7:30 PM EST"
use super::snapshot::{GameRecord, PropRecord};
use crate::odds::Sport;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Wire types ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sport_key: Option<String>,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markets: Vec<BookMarket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub point: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

const EST_OFFSET_SECS: i32 = -5 * 3600;

// ── Game lines ──

pub fn normalize_games(events: &[OddsEvent], now: DateTime<Utc>) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(events.len());

    for event in events {
        let Some(commence) = parse_datetime(&event.commence_time) else {
            tracing::warn!(
                home = %event.home_team,
                away = %event.away_team,
                commence_time = %event.commence_time,
                "unparseable commence_time, skipping event"
            );
            continue;
        };
        if commence < now {
            tracing::debug!(home = %event.home_team, away = %event.away_team, "already started, skipping");
            continue;
        }
        let Some(book) = event.bookmakers.first() else {
            tracing::debug!(home = %event.home_team, away = %event.away_team, "no bookmakers");
            continue;
        };

        let market = |key: &str| book.markets.iter().find(|m| m.key == key);

        games.push(GameRecord {
            home: event.home_team.clone(),
            away: event.away_team.clone(),
            time: display_time(commence),
            moneyline: market("h2h")
                .and_then(|m| format_moneyline(m, &event.home_team, &event.away_team)),
            spread: market("spreads").and_then(format_spread),
            total: market("totals").and_then(format_total),
        });
    }

    games
}

/// "<home>/<away>". Outcomes are matched by team name; if the names do not
/// line up the provider's order is kept.
pub fn format_moneyline(market: &BookMarket, home_team: &str, away_team: &str) -> Option<String> {
    if market.outcomes.len() != 2 {
        return None;
    }
    let home = market.outcomes.iter().find(|o| o.name == home_team);
    let away = market.outcomes.iter().find(|o| o.name == away_team);
    let (first, second) = match (home, away) {
        (Some(h), Some(a)) => (h, a),
        _ => (&market.outcomes[0], &market.outcomes[1]),
    };
    Some(format!("{}/{}", format_odds(first.price)?, format_odds(second.price)?))
}

pub fn format_spread(market: &BookMarket) -> Option<String> {
    if market.outcomes.len() != 2 {
        return None;
    }
    let favorite = market
        .outcomes
        .iter()
        .min_by(|a, b| a.point.unwrap_or(0.0).total_cmp(&b.point.unwrap_or(0.0)))?;
    let point = favorite.point?;
    Some(format!("{point} ({})", format_odds(favorite.price)?))
}

pub fn format_total(market: &BookMarket) -> Option<String> {
    if market.outcomes.len() != 2 {
        return None;
    }
    let over = market.outcomes.iter().find(|o| o.name == "Over")?;
    let point = over.point?;
    Some(format!("O/U {point} ({})", format_odds(over.price)?))
}

/// "+130" / "-150". Fractional prices are truncated toward zero.
pub fn format_odds(price: f64) -> Option<String> {
    let odds = american_from_price(price)?;
    Some(if odds > 0 {
        format!("+{odds}")
    } else {
        odds.to_string()
    })
}

// ── Player props ──

/// One row per (bookmaker, player, market, line), with the Over and Under
/// prices merged. Only the sport's supported prop markets are kept.
pub fn normalize_props(sport: Sport, events: &[OddsEvent], now: DateTime<Utc>) -> Vec<PropRecord> {
    let supported = sport.prop_markets();
    let mut rows: Vec<PropRecord> = Vec::new();
    let mut index: HashMap<(String, String, String, u64), usize> = HashMap::new();

    for event in events {
        let Some(commence) = parse_datetime(&event.commence_time) else {
            continue;
        };
        if commence < now {
            continue;
        }
        let time = display_time(commence);
        let game = format!("{} @ {}", event.away_team, event.home_team);

        for book in &event.bookmakers {
            for market in book.markets.iter().filter(|m| supported.contains(&m.key.as_str())) {
                for outcome in &market.outcomes {
                    let Some(player) = outcome.description.as_deref().filter(|p| !p.is_empty()) else {
                        continue;
                    };
                    let Some(price) = american_from_price(outcome.price) else {
                        continue;
                    };

                    let key = (
                        book.title.clone(),
                        player.to_string(),
                        market.key.clone(),
                        outcome.point.map(f64::to_bits).unwrap_or(0),
                    );
                    let slot = *index.entry(key).or_insert_with(|| {
                        rows.push(PropRecord {
                            time: time.clone(),
                            game: game.clone(),
                            player: player.to_string(),
                            stat_type: prop_label(&market.key),
                            line: outcome.point,
                            over: None,
                            under: None,
                        });
                        rows.len() - 1
                    });

                    match outcome.name.as_str() {
                        "Over" => rows[slot].over = Some(price),
                        "Under" => rows[slot].under = Some(price),
                        _ => {}
                    }
                }
            }
        }
    }

    rows
}

/// "player_pass_tds" → "Pass Tds"
pub fn prop_label(market_key: &str) -> String {
    market_key
        .trim_start_matches("player_")
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ── Time helpers ──

pub fn display_time(dt: DateTime<Utc>) -> String {
    let est = match FixedOffset::east_opt(EST_OFFSET_SECS) {
        Some(offset) => dt.with_timezone(&offset),
        None => return dt.format("%H:%M UTC").to_string(),
    };
    let clock = est.format("%I:%M %p").to_string();
    format!("{} EST", clock.trim_start_matches('0'))
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

/// Truncates toward zero. Non-finite or out-of-range prices are dropped.
pub(crate) fn american_from_price(price: f64) -> Option<i32> {
    if !price.is_finite() || price.abs() >= f64::from(i32::MAX) {
        return None;
    }
    Some(price.trunc() as i32)
}
