use crate::odds::{PropStat, Sport};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum BetType {
    Moneyline,
    Spread,
    Total,
    PlayerProp(PropStat),
}

impl std::fmt::Display for BetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moneyline => write!(f, "Moneyline"),
            Self::Spread => write!(f, "Spread"),
            Self::Total => write!(f, "Total"),
            Self::PlayerProp(stat) => write!(f, "Player Prop - {stat}"),
        }
    }
}

impl Serialize for BetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A wager that cleared its EV threshold. Built once by the scanner and
/// never mutated. Serialized field names are the external contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BettingOpportunity {
    pub sport: Sport,
    #[serde(rename = "time")]
    pub scheduled_time: String,
    pub matchup: String,
    pub bet_type: BetType,
    pub pick: String,
    pub line: Option<f64>,
    #[serde(rename = "odds")]
    pub american_odds: i32,
    #[serde(skip)]
    pub estimated_probability: f64,
    pub expected_value: f64,
    #[serde(rename = "analysis")]
    pub rationale: String,
}
