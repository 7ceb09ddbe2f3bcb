use crate::scanner::opportunity::BettingOpportunity;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Opportunities ordered by descending expected value. Rebuilt from scratch
/// every cycle; there is no incremental update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedOpportunityList {
    pub generated_at: Option<String>,
    opportunities: Vec<BettingOpportunity>,
}

/// Stable descending sort by EV. Equal EVs keep their input order and
/// nothing is deduplicated. Ranking an already ranked list is a no-op.
pub fn rank(mut opportunities: Vec<BettingOpportunity>) -> RankedOpportunityList {
    // sort_by is stable
    opportunities.sort_by(|a, b| b.expected_value.total_cmp(&a.expected_value));
    RankedOpportunityList {
        generated_at: None,
        opportunities,
    }
}

impl RankedOpportunityList {
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at.to_rfc3339_opts(SecondsFormat::Secs, true));
        self
    }

    pub fn top(&self, n: usize) -> &[BettingOpportunity] {
        &self.opportunities[..n.min(self.opportunities.len())]
    }

    pub fn len(&self) -> usize {
        self.opportunities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }

    pub fn best_ev(&self) -> Option<f64> {
        self.opportunities.first().map(|o| o.expected_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::Sport;
    use crate::scanner::opportunity::BetType;
    use chrono::TimeZone;

    fn opp(tag: &str, ev: f64) -> BettingOpportunity {
        BettingOpportunity {
            sport: Sport::Nba,
            scheduled_time: String::new(),
            matchup: tag.to_string(),
            bet_type: BetType::Moneyline,
            pick: tag.to_string(),
            line: None,
            american_odds: 130,
            estimated_probability: 0.5,
            expected_value: ev,
            rationale: String::new(),
        }
    }

    fn tags(list: &RankedOpportunityList) -> Vec<&str> {
        list.opportunities.iter().map(|o| o.pick.as_str()).collect()
    }

    #[test]
    fn test_already_sorted_input_unchanged() {
        let ranked = rank(vec![opp("a", 0.30), opp("b", 0.30), opp("c", 0.12)]);
        assert_eq!(tags(&ranked), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(vec![opp("idx0", 0.12), opp("idx1", 0.30), opp("idx2", 0.30)]);
        assert_eq!(tags(&ranked), vec!["idx1", "idx2", "idx0"]);
    }

    #[test]
    fn test_non_increasing_and_no_dedup() {
        let input = vec![
            opp("x", 0.2),
            opp("x", 0.2),
            opp("y", 0.5),
            opp("z", 0.11),
            opp("w", 0.45),
        ];
        let ranked = rank(input);
        assert_eq!(ranked.len(), 5);
        let evs: Vec<f64> = ranked.opportunities.iter().map(|o| o.expected_value).collect();
        assert!(evs.windows(2).all(|w| w[0] >= w[1]), "{evs:?}");
        assert_eq!(ranked.best_ev(), Some(0.5));
    }

    #[test]
    fn test_total_order_with_nan() {
        let ranked = rank(vec![opp("a", 0.2), opp("nan", f64::NAN), opp("b", 0.4)]);
        assert_eq!(tags(&ranked), vec!["nan", "b", "a"]);
        assert_eq!(rank(ranked.opportunities.clone()).len(), 3);
    }

    #[test]
    fn test_idempotent() {
        let once = rank(vec![opp("a", 0.12), opp("b", 0.3), opp("c", 0.3), opp("d", 0.2)]);
        let twice = rank(once.opportunities.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_and_top() {
        let empty = rank(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.top(10).is_empty());
        assert_eq!(empty.best_ev(), None);

        let ranked = rank(vec![opp("a", 0.2), opp("b", 0.4), opp("c", 0.3)]);
        let top: Vec<&str> = ranked.top(2).iter().map(|o| o.pick.as_str()).collect();
        assert_eq!(top, vec!["b", "c"]);
        assert_eq!(ranked.top(99).len(), 3);
    }

    #[test]
    fn test_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let ranked = rank(vec![opp("a", 0.2)]).with_timestamp(at);
        assert_eq!(ranked.generated_at.as_deref(), Some("2024-01-15T12:00:00Z"));
    }
}
