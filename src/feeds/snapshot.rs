use super::odds_api::{self, OddsEvent};
use crate::errors::{EngineError, EngineResult};
use crate::odds::{GameContext, Sport};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One game row as handed over by the odds fetcher. Odds fields hold raw
/// provider text; empty strings are treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, alias = "ML")]
    pub moneyline: Option<String>,
    #[serde(default)]
    pub spread: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
}

impl GameRecord {
    pub fn context(&self, sport: Sport) -> GameContext {
        GameContext {
            sport,
            scheduled_time: self.time.clone(),
            home_team: self.home.clone(),
            away_team: self.away.clone(),
        }
    }
}

/// One player-prop row. Either side price may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropRecord {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub game: String,
    pub player: String,
    #[serde(alias = "type")]
    pub stat_type: String,
    #[serde(default)]
    pub line: Option<f64>,
    #[serde(default, deserialize_with = "price_opt")]
    pub over: Option<i32>,
    #[serde(default, deserialize_with = "price_opt")]
    pub under: Option<i32>,
}

/// Prices may arrive as floats (`-120.0`) from tabular exports.
fn price_opt<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(odds_api::american_from_price))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SportSlate {
    pub sport: Sport,
    pub games: Vec<GameRecord>,
    pub props: Vec<PropRecord>,
}

/// Everything one scan cycle sees. Built once, then only read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub slates: Vec<SportSlate>,
}

/// A single unit of scan work, owned so it can move to a worker thread.
#[derive(Debug, Clone)]
pub enum ScanRow {
    Game(Sport, GameRecord),
    Prop(Sport, PropRecord),
}

impl Snapshot {
    pub fn game_count(&self) -> usize {
        self.slates.iter().map(|s| s.games.len()).sum()
    }

    pub fn prop_count(&self) -> usize {
        self.slates.iter().map(|s| s.props.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.game_count() == 0 && self.prop_count() == 0
    }

    /// Rows in scan order: slate by slate, games before props.
    pub fn rows(&self) -> Vec<ScanRow> {
        let mut rows = Vec::with_capacity(self.game_count() + self.prop_count());
        for slate in &self.slates {
            rows.extend(slate.games.iter().cloned().map(|g| ScanRow::Game(slate.sport, g)));
            rows.extend(slate.props.iter().cloned().map(|p| ScanRow::Prop(slate.sport, p)));
        }
        rows
    }
}

// ── File format ──

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    slates: Vec<SlateInput>,
}

/// A slate may carry already-normalized rows, raw provider events, or both.
/// Rows stay untyped until `into_slate` so one bad row is dropped alone.
#[derive(Debug, Deserialize)]
struct SlateInput {
    sport: Sport,
    #[serde(default)]
    games: Vec<serde_json::Value>,
    #[serde(default)]
    props: Vec<serde_json::Value>,
    #[serde(default)]
    events: Vec<serde_json::Value>,
    #[serde(default)]
    prop_events: Vec<serde_json::Value>,
}

impl SlateInput {
    fn into_slate(self, now: DateTime<Utc>) -> SportSlate {
        let sport = self.sport;
        let events: Vec<OddsEvent> = typed_rows(sport, "event", self.events);
        let prop_events: Vec<OddsEvent> = typed_rows(sport, "prop_event", self.prop_events);

        let mut games: Vec<GameRecord> = typed_rows(sport, "game", self.games);
        games.extend(odds_api::normalize_games(&events, now));

        let mut props: Vec<PropRecord> = typed_rows(sport, "prop", self.props);
        props.extend(odds_api::normalize_props(sport, &prop_events, now));

        SportSlate {
            sport,
            games,
            props,
        }
    }
}

fn typed_rows<T: DeserializeOwned>(sport: Sport, what: &str, rows: Vec<serde_json::Value>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(typed) => Some(typed),
            Err(e) => {
                tracing::debug!(sport = %sport, row = what, index, error = %e, "skipping malformed row");
                None
            }
        })
        .collect()
}

pub fn parse_snapshot(json: &str, now: DateTime<Utc>) -> EngineResult<Snapshot> {
    let file: SnapshotFile = serde_json::from_str(json)?;
    Ok(Snapshot {
        slates: file.slates.into_iter().map(|s| s.into_slate(now)).collect(),
    })
}

/// Read and normalize the snapshot file. A missing file is an error for the
/// cycle (logged by the caller), not an empty snapshot.
pub fn load_snapshot(path: &Path, now: DateTime<Utc>) -> EngineResult<Snapshot> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Snapshot(format!("read {}: {e}", path.display())))?;
    let snapshot = parse_snapshot(&json, now)?;
    tracing::debug!(
        path = %path.display(),
        slates = snapshot.slates.len(),
        games = snapshot.game_count(),
        props = snapshot.prop_count(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_normalized_snapshot() {
        let json = r#"{
            "slates": [{
                "sport": "NBA",
                "games": [{"home": "Boston Celtics", "away": "Miami Heat", "time": "7:30 PM EST",
                           "moneyline": "-150/+130", "spread": "-3.5 (-110)"}],
                "props": [{"game": "Miami Heat @ Boston Celtics", "player": "Jayson Tatum",
                           "type": "Points", "line": 27.5, "over": -120, "under": null}]
            }, {
                "sport": "NFL"
            }]
        }"#;
        let snap = parse_snapshot(json, now()).unwrap();
        assert_eq!(snap.slates.len(), 2);
        assert_eq!(snap.slates[0].sport, Sport::Nba);
        assert_eq!(snap.game_count(), 1);
        assert_eq!(snap.prop_count(), 1);
        let g = &snap.slates[0].games[0];
        assert_eq!(g.total, None);
        assert_eq!(snap.slates[0].props[0].stat_type, "Points");
        assert_eq!(snap.slates[0].props[0].under, None);
    }

    #[test]
    fn test_parse_raw_events() {
        let json = r#"{
            "slates": [{
                "sport": "basketball_nba",
                "events": [{
                    "commence_time": "2024-01-16T00:30:00Z",
                    "home_team": "Boston Celtics",
                    "away_team": "Miami Heat",
                    "bookmakers": [{"title": "DraftKings", "markets": [
                        {"key": "h2h", "outcomes": [
                            {"name": "Boston Celtics", "price": -150},
                            {"name": "Miami Heat", "price": 130}]}
                    ]}]
                }]
            }]
        }"#;
        let snap = parse_snapshot(json, now()).unwrap();
        assert_eq!(snap.slates[0].sport, Sport::Nba);
        assert_eq!(snap.game_count(), 1);
        assert_eq!(snap.slates[0].games[0].moneyline.as_deref(), Some("-150/+130"));
    }

    #[test]
    fn test_bad_rows_dropped_individually() {
        let json = r#"{
            "slates": [{
                "sport": "NBA",
                "games": [
                    {"home": "Boston Celtics", "away": "Miami Heat", "moneyline": "-150/+130"},
                    {"away": "Orlando Magic", "moneyline": "-110/-110"},
                    {"home": "Denver Nuggets", "away": "Utah Jazz", "moneyline": -150}
                ],
                "props": [
                    {"player": "Jayson Tatum", "type": "Points", "line": 27.5,
                     "over": -120.0, "under": 100.0},
                    {"player": "Jaylen Brown", "type": "Points", "line": "high"}
                ]
            }]
        }"#;
        let snap = parse_snapshot(json, now()).unwrap();
        assert_eq!(snap.game_count(), 1);
        assert_eq!(snap.slates[0].games[0].home, "Boston Celtics");

        assert_eq!(snap.prop_count(), 1);
        let prop = &snap.slates[0].props[0];
        assert_eq!(prop.player, "Jayson Tatum");
        assert_eq!(prop.over, Some(-120));
        assert_eq!(prop.under, Some(100));
    }

    #[test]
    fn test_rows_order() {
        let snap = Snapshot {
            slates: vec![SportSlate {
                sport: Sport::Nfl,
                games: vec![GameRecord {
                    home: "H".into(),
                    away: "A".into(),
                    time: String::new(),
                    moneyline: None,
                    spread: None,
                    total: None,
                }],
                props: vec![PropRecord {
                    time: String::new(),
                    game: "A @ H".into(),
                    player: "P".into(),
                    stat_type: "Receptions".into(),
                    line: Some(4.5),
                    over: Some(-110),
                    under: None,
                }],
            }],
        };
        let rows = snap.rows();
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[0], ScanRow::Game(Sport::Nfl, _)));
        assert!(matches!(rows[1], ScanRow::Prop(Sport::Nfl, _)));
    }

    #[test]
    fn test_empty_and_malformed() {
        let snap = parse_snapshot("{}", now()).unwrap();
        assert!(snap.is_empty());
        assert!(matches!(parse_snapshot("not json", now()), Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_snapshot(Path::new("/nonexistent/ev_ranker/snapshot.json"), now());
        assert!(matches!(err, Err(EngineError::Snapshot(_))));
    }
}
