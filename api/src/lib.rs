pub mod client;
pub mod report;
pub mod wire;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub use report::{MatchStatus, ReportEntry, build_reports};

// ---------------------------------------------------------------------------
// Stored entities — what the service keeps and returns from its CRUD routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub logo: String,
    pub founded: i32, // year
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub players: Vec<Player>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub height: u32, // cm
    pub weight: u32, // kg
    pub position: String,
    pub number: u32,
    pub team_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub home_team_id: u32,
    pub away_team_id: u32,
}

/// A stored scoring occurrence.
///
/// `home_score`/`away_score` carry the scoreline *after* this goal rather than
/// which side scored, so only the last event of a match tells the final score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvent {
    pub id: u32,
    pub match_id: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub scorer_name: String,
    pub goal_minute: u32,
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub founded: i32,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

/// Partial team update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl TeamPatch {
    pub fn apply(self, team: &mut Team) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(logo) = self.logo {
            team.logo = logo;
        }
        if let Some(founded) = self.founded {
            team.founded = founded;
        }
        if let Some(address) = self.address {
            team.address = address;
        }
        if let Some(city) = self.city {
            team.city = city;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub position: String,
    pub number: u32,
    pub team_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub home_team_id: u32,
    pub away_team_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGoalEvent {
    pub match_id: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub scorer_name: String,
    #[serde(default)]
    pub goal_minute: u32,
}

// ---------------------------------------------------------------------------
// Report read model — what storage hands to the report engine
// ---------------------------------------------------------------------------

/// A team reference with its display name already looked up.
/// `name` is None when the team could not be resolved (e.g. soft deleted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRef {
    pub id: u32,
    pub name: Option<String>,
}

impl TeamRef {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: Some(name.into()) }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// One match with both participants and its goal events in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: u32,
    pub home: TeamRef,
    pub away: TeamRef,
    pub events: Vec<GoalEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_patch_only_touches_present_fields() {
        let mut team = Team {
            id: 1,
            name: "Rovers".into(),
            city: "Leeds".into(),
            founded: 1901,
            ..Default::default()
        };
        TeamPatch { city: Some("York".into()), ..Default::default() }.apply(&mut team);
        assert_eq!(team.name, "Rovers");
        assert_eq!(team.city, "York");
        assert_eq!(team.founded, 1901);
    }

    #[test]
    fn team_patch_deserializes_from_partial_json() {
        let patch: TeamPatch = serde_json::from_str(r#"{"name":"United"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("United"));
        assert!(patch.city.is_none());
    }

    #[test]
    fn unresolved_team_ref_displays_empty_name() {
        let unresolved = TeamRef { id: 9, name: None };
        assert_eq!(unresolved.display_name(), "");
        assert_eq!(TeamRef::new(3, "City").display_name(), "City");
    }

    #[test]
    fn new_match_parses_date_and_time() {
        let m: NewMatch = serde_json::from_str(
            r#"{"date":"2026-05-01","time":"19:30:00","home_team_id":1,"away_team_id":2}"#,
        )
        .unwrap();
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        assert_eq!(m.time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
    }
}
