use crate::ranking::RankedOpportunityList;
use std::fmt::Write;

const HEADER: &str = "Best Betting Opportunities Today:";

/// Plain-text rendering of the top `n` opportunities, one block per bet.
pub fn render_report(ranked: &RankedOpportunityList, n: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "{}", "=".repeat(HEADER.len()));

    if ranked.is_empty() {
        let _ = writeln!(out, "\nNo bets cleared their EV threshold.");
        return out;
    }

    for bet in ranked.top(n) {
        let _ = writeln!(out, "\n{} - {}", bet.sport, bet.scheduled_time);
        let _ = writeln!(out, "Matchup: {}", bet.matchup);
        let _ = writeln!(out, "Bet Type: {}", bet.bet_type);
        let _ = writeln!(out, "Pick: {}", bet.pick);
        let _ = writeln!(out, "Analysis: {}", bet.rationale);
        let _ = writeln!(out, "Expected Value: {:.1}%", bet.expected_value * 100.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::{PropStat, Sport};
    use crate::ranking::rank;
    use crate::scanner::opportunity::{BetType, BettingOpportunity};

    fn opp(pick: &str, ev: f64) -> BettingOpportunity {
        BettingOpportunity {
            sport: Sport::Nba,
            scheduled_time: "7:30 PM EST".into(),
            matchup: "Miami Heat @ Boston Celtics".into(),
            bet_type: BetType::PlayerProp(PropStat::Points),
            pick: pick.into(),
            line: Some(27.5),
            american_odds: 300,
            estimated_probability: 0.35,
            expected_value: ev,
            rationale: "Player averaging above line".into(),
        }
    }

    #[test]
    fn test_report_block() {
        let ranked = rank(vec![opp("Jayson Tatum Over 27.5", 0.4)]);
        let text = render_report(&ranked, 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Best Betting Opportunities Today:");
        assert_eq!(lines[1], "=================================");
        assert_eq!(lines[3], "NBA - 7:30 PM EST");
        assert_eq!(lines[4], "Matchup: Miami Heat @ Boston Celtics");
        assert_eq!(lines[5], "Bet Type: Player Prop - Points");
        assert_eq!(lines[6], "Pick: Jayson Tatum Over 27.5");
        assert_eq!(lines[8], "Expected Value: 40.0%");
    }

    #[test]
    fn test_report_truncates_to_n() {
        let ranked = rank(vec![opp("a", 0.2), opp("b", 0.3), opp("c", 0.25)]);
        let text = render_report(&ranked, 2);
        assert_eq!(text.matches("Pick:").count(), 2);
        assert!(text.contains("Pick: b"));
        assert!(!text.contains("Pick: a"));
    }

    #[test]
    fn test_report_empty() {
        let text = render_report(&rank(Vec::new()), 10);
        assert!(text.contains("No bets cleared"));
    }
}
