pub mod parser;

use serde::{Deserialize, Serialize};

// ── Sport ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    #[serde(rename = "NBA", alias = "basketball_nba")]
    Nba,
    #[serde(rename = "NFL", alias = "americanfootball_nfl")]
    Nfl,
    #[default]
    #[serde(other)]
    Other,
}

impl Sport {
    /// Player-prop markets the provider supports for this sport.
    pub fn prop_markets(&self) -> &'static [&'static str] {
        match self {
            Self::Nba => &["player_points", "player_rebounds", "player_assists"],
            Self::Nfl => &["player_pass_tds", "player_receptions"],
            Self::Other => &[],
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nba => write!(f, "NBA"),
            Self::Nfl => write!(f, "NFL"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

// ── Bet kinds and sides ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetKind {
    Moneyline,
    Spread,
    Total,
    Prop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneylineSide {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadSide {
    Favorite,
    Underdog,
}

impl std::fmt::Display for SpreadSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Favorite => write!(f, "Favorite"),
            Self::Underdog => write!(f, "Underdog"),
        }
    }
}

/// Over/Under. Shared by game totals and player props.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverUnder {
    Over,
    Under,
}

impl std::fmt::Display for OverUnder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Over => write!(f, "Over"),
            Self::Under => write!(f, "Under"),
        }
    }
}

// ── Prop stat types ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropStat {
    Points,
    Rebounds,
    Assists,
    PassTds,
    Receptions,
    Other(String),
}

impl PropStat {
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "points" => Self::Points,
            "rebounds" => Self::Rebounds,
            "assists" => Self::Assists,
            "passtds" | "passingtds" | "passingtouchdowns" => Self::PassTds,
            "receptions" => Self::Receptions,
            _ => Self::Other(label.trim().to_string()),
        }
    }
}

impl std::fmt::Display for PropStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Points => write!(f, "Points"),
            Self::Rebounds => write!(f, "Rebounds"),
            Self::Assists => write!(f, "Assists"),
            Self::PassTds => write!(f, "Pass Tds"),
            Self::Receptions => write!(f, "Receptions"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

// ── Parsed odds ──

/// Structured odds for one market. `american_odds` is never zero and every
/// `implied_probability` lies in (0, 1).
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOdds {
    Moneyline {
        favored_side: MoneylineSide,
        american_odds: i32,
        implied_probability: f64,
    },
    Spread {
        side: SpreadSide,
        points: f64,
        american_odds: i32,
        implied_probability: f64,
    },
    Total {
        line_value: f64,
        american_odds: i32,
        pick: OverUnder,
        implied_probability: f64,
    },
    Prop {
        player: String,
        stat_type: PropStat,
        line_value: f64,
        over_odds: Option<i32>,
        under_odds: Option<i32>,
    },
}

impl ParsedOdds {
    /// The single quoted price of a game market. Props carry two.
    pub fn american_odds(&self) -> Option<i32> {
        match self {
            Self::Moneyline { american_odds, .. }
            | Self::Spread { american_odds, .. }
            | Self::Total { american_odds, .. } => Some(*american_odds),
            Self::Prop { .. } => None,
        }
    }
}

// ── Game context ──

/// Fixed per scan cycle; only ever borrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContext {
    pub sport: Sport,
    pub scheduled_time: String,
    pub home_team: String,
    pub away_team: String,
}

impl GameContext {
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }

    pub fn team(&self, side: MoneylineSide) -> &str {
        match side {
            MoneylineSide::Home => &self.home_team,
            MoneylineSide::Away => &self.away_team,
        }
    }
}
