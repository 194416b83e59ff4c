//! Match report aggregation.
//!
//! Turns the stored match list into one [`ReportEntry`] per match, carrying the
//! final score, outcome, top scorer and running win totals for both teams.
//! Win totals are cumulative over the input order, so callers must hand
//! matches over in a stable storage order and never re-sort them.
use crate::{GoalEvent, MatchRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "Home Win")]
    HomeWin,
    #[serde(rename = "Away Win")]
    AwayWin,
    #[default]
    Draw,
}

impl MatchStatus {
    pub fn from_score(home_score: u32, away_score: u32) -> Self {
        if home_score > away_score {
            MatchStatus::HomeWin
        } else if away_score > home_score {
            MatchStatus::AwayWin
        } else {
            MatchStatus::Draw
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::HomeWin => "Home Win",
            MatchStatus::AwayWin => "Away Win",
            MatchStatus::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub match_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub status: MatchStatus,
    pub top_scorer: String, // empty when nobody scored
    pub home_total_wins: u32,
    pub away_total_wins: u32,
}

/// Running win totals for one aggregation pass. Home and away wins are kept
/// apart: a team's home wins never show up in its away total.
#[derive(Debug, Default)]
pub struct TeamWinCounters {
    home: HashMap<u32, u32>,
    away: HashMap<u32, u32>,
}

impl TeamWinCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit the winner of a match. Draws change nothing.
    pub fn record(&mut self, status: MatchStatus, home_team_id: u32, away_team_id: u32) {
        match status {
            MatchStatus::HomeWin => *self.home.entry(home_team_id).or_default() += 1,
            MatchStatus::AwayWin => *self.away.entry(away_team_id).or_default() += 1,
            MatchStatus::Draw => {}
        }
    }

    pub fn home_wins(&self, team_id: u32) -> u32 {
        self.home.get(&team_id).copied().unwrap_or(0)
    }

    pub fn away_wins(&self, team_id: u32) -> u32 {
        self.away.get(&team_id).copied().unwrap_or(0)
    }
}

/// Final scoreline of a match: the running score carried by its last event,
/// or 0-0 when nothing was scored.
pub fn final_score(events: &[GoalEvent]) -> (u32, u32) {
    events
        .last()
        .map(|e| (e.home_score, e.away_score))
        .unwrap_or((0, 0))
}

/// Name with the most goal events in the match.
///
/// Ties go to the scorer who got on the sheet first.
pub fn top_scorer(events: &[GoalEvent]) -> Option<&str> {
    // (name, goals) in order of first appearance
    let mut tally: Vec<(&str, u32)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for event in events {
        let name = event.scorer_name.as_str();
        match index.get(name).copied() {
            Some(i) => tally[i].1 += 1,
            None => {
                index.insert(name, tally.len());
                tally.push((name, 1));
            }
        }
    }

    let mut best: Option<(&str, u32)> = None;
    for (name, goals) in tally {
        if best.is_none_or(|(_, most)| goals > most) {
            best = Some((name, goals));
        }
    }
    best.map(|(name, _)| name)
}

/// Build one report entry per match, in input order.
pub fn build_reports(matches: &[MatchRecord]) -> Vec<ReportEntry> {
    let mut wins = TeamWinCounters::new();
    matches
        .iter()
        .map(|m| {
            let (home_score, away_score) = final_score(&m.events);
            let status = MatchStatus::from_score(home_score, away_score);
            wins.record(status, m.home.id, m.away.id);

            ReportEntry {
                match_id: m.id,
                home_team: m.home.display_name().to_owned(),
                away_team: m.away.display_name().to_owned(),
                home_score,
                away_score,
                status,
                top_scorer: top_scorer(&m.events).unwrap_or_default().to_owned(),
                home_total_wins: wins.home_wins(m.home.id),
                away_total_wins: wins.away_wins(m.away.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamRef;

    fn goal(home_score: u32, away_score: u32, scorer: &str) -> GoalEvent {
        GoalEvent {
            home_score,
            away_score,
            scorer_name: scorer.into(),
            ..Default::default()
        }
    }

    fn fixture(id: u32, home: u32, away: u32, events: Vec<GoalEvent>) -> MatchRecord {
        MatchRecord {
            id,
            home: TeamRef::new(home, format!("Team {home}")),
            away: TeamRef::new(away, format!("Team {away}")),
            events,
        }
    }

    fn home_win(id: u32, home: u32, away: u32) -> MatchRecord {
        fixture(id, home, away, vec![goal(1, 0, "x")])
    }

    fn away_win(id: u32, home: u32, away: u32) -> MatchRecord {
        fixture(id, home, away, vec![goal(0, 1, "y")])
    }

    #[test]
    fn empty_input_gives_empty_report() {
        assert!(build_reports(&[]).is_empty());
    }

    #[test]
    fn match_without_goals_is_goalless_draw() {
        let reports = build_reports(&[home_win(1, 1, 2), fixture(2, 1, 2, vec![])]);
        let draw = &reports[1];
        assert_eq!((draw.home_score, draw.away_score), (0, 0));
        assert_eq!(draw.status, MatchStatus::Draw);
        assert_eq!(draw.top_scorer, "");
        assert_eq!(draw.home_total_wins, reports[0].home_total_wins);
        assert_eq!(draw.away_total_wins, 0);
    }

    #[test]
    fn last_event_decides_score_and_most_goals_wins_top_scorer() {
        let m = fixture(
            7,
            1,
            2,
            vec![goal(1, 0, "A"), goal(2, 0, "A"), goal(2, 1, "B")],
        );
        let reports = build_reports(&[m]);
        let r = &reports[0];
        assert_eq!(r.match_id, 7);
        assert_eq!((r.home_score, r.away_score), (2, 1));
        assert_eq!(r.status, MatchStatus::HomeWin);
        assert_eq!(r.top_scorer, "A");
        assert_eq!(r.home_total_wins, 1);
        assert_eq!(r.away_total_wins, 0);
    }

    #[test]
    fn home_wins_accumulate_across_matches() {
        let reports = build_reports(&[home_win(1, 5, 6), home_win(2, 5, 7)]);
        assert_eq!(reports[0].home_total_wins, 1);
        assert_eq!(reports[1].home_total_wins, 2);
    }

    #[test]
    fn home_and_away_wins_are_counted_separately() {
        // team 1 wins at home, then wins away: its away total starts from zero
        let reports = build_reports(&[home_win(1, 1, 2), away_win(2, 3, 1)]);
        assert_eq!(reports[1].away_total_wins, 1);
        assert_eq!(reports[1].home_total_wins, 0);
    }

    #[test]
    fn totals_match_prior_outcomes_with_interleaved_teams() {
        let matches = vec![
            home_win(1, 1, 2),
            away_win(2, 3, 4),
            home_win(3, 3, 1),
            fixture(4, 1, 4, vec![goal(1, 1, "z")]),
            home_win(5, 1, 3),
            away_win(6, 2, 4),
        ];
        let reports = build_reports(&matches);

        for (i, entry) in reports.iter().enumerate() {
            let m = &matches[i];
            let expected_home = reports[..=i]
                .iter()
                .zip(&matches)
                .filter(|(r, prior)| r.status == MatchStatus::HomeWin && prior.home.id == m.home.id)
                .count() as u32;
            let expected_away = reports[..=i]
                .iter()
                .zip(&matches)
                .filter(|(r, prior)| r.status == MatchStatus::AwayWin && prior.away.id == m.away.id)
                .count() as u32;
            assert_eq!(entry.home_total_wins, expected_home, "home total at entry {i}");
            assert_eq!(entry.away_total_wins, expected_away, "away total at entry {i}");
        }
        assert_eq!(reports[4].home_total_wins, 2);
        assert_eq!(reports[5].away_total_wins, 2);
    }

    #[test]
    fn reordering_input_changes_running_totals() {
        let first = home_win(1, 1, 2);
        let second = home_win(2, 1, 3);
        let forward = build_reports(&[first.clone(), second.clone()]);
        let reversed = build_reports(&[second, first]);
        assert_eq!(forward[0].match_id, 1);
        assert_eq!(forward[0].home_total_wins, 1);
        assert_eq!(reversed[1].match_id, 1);
        assert_eq!(reversed[1].home_total_wins, 2);
    }

    #[test]
    fn top_scorer_tie_goes_to_first_scorer() {
        let events = vec![goal(0, 1, "B"), goal(1, 1, "A"), goal(2, 1, "A"), goal(2, 2, "B")];
        assert_eq!(top_scorer(&events), Some("B"));
        assert_eq!(top_scorer(&[]), None);
    }

    #[test]
    fn unresolved_team_names_become_empty_strings() {
        let m = MatchRecord {
            id: 3,
            home: TeamRef { id: 1, name: None },
            away: TeamRef::new(2, "Wanderers"),
            events: vec![goal(0, 1, "K")],
        };
        let reports = build_reports(&[m]);
        assert_eq!(reports[0].home_team, "");
        assert_eq!(reports[0].away_team, "Wanderers");
        assert_eq!(reports[0].away_total_wins, 1);
    }

    #[test]
    fn report_entry_uses_stable_wire_names() {
        let reports = build_reports(&[fixture(1, 1, 2, vec![goal(0, 1, "K")])]);
        let json = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(json["status"], "Away Win");
        assert_eq!(json["home_team"], "Team 1");
        assert_eq!(json["top_scorer"], "K");
        assert_eq!(json["away_total_wins"], 1);
        for key in ["match_id", "home_score", "away_score", "home_total_wins"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn status_classification() {
        assert_eq!(MatchStatus::from_score(3, 0), MatchStatus::HomeWin);
        assert_eq!(MatchStatus::from_score(0, 2), MatchStatus::AwayWin);
        assert_eq!(MatchStatus::from_score(2, 2).label(), "Draw");
    }
}
