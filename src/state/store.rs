use chrono::{DateTime, Utc};
use football_api::{
    GoalEvent, Match, MatchRecord, NewGoalEvent, NewMatch, NewPlayer, NewTeam, Player, Team,
    TeamPatch, TeamRef,
};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(msg) | StoreError::Conflict(msg) | StoreError::Invalid(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct Admin {
    pub id: u32,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
struct TeamRow {
    team: Team,
    deleted_at: Option<DateTime<Utc>>,
}

impl TeamRow {
    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

// ---------------------------------------------------------------------------
// In-memory tables
// ---------------------------------------------------------------------------

/// Process-local storage. Rows are never hard deleted, so ids are dense and
/// every table is kept in ascending id order.
#[derive(Debug, Default)]
pub struct Store {
    admins: Vec<Admin>,
    teams: Vec<TeamRow>,
    players: Vec<Player>,
    matches: Vec<Match>,
    goals: Vec<GoalEvent>,
}

fn next_id(len: usize) -> u32 {
    len as u32 + 1
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }

    pub fn find_admin(&self, username: &str) -> Option<&Admin> {
        self.admins.iter().find(|a| a.username == username)
    }

    pub fn create_admin(&mut self, username: &str, password_hash: String) -> StoreResult<&Admin> {
        if self.find_admin(username).is_some() {
            return Err(StoreError::Conflict(format!("Admin {username} already exists")));
        }
        let id = next_id(self.admins.len());
        self.admins.push(Admin { id, username: username.to_owned(), password_hash });
        Ok(&self.admins[self.admins.len() - 1])
    }

    fn live_team(&self, id: u32) -> Option<&TeamRow> {
        self.teams.iter().find(|row| row.team.id == id && row.is_live())
    }

    fn live_team_mut(&mut self, id: u32) -> Option<&mut TeamRow> {
        self.teams.iter_mut().find(|row| row.team.id == id && row.is_live())
    }

    fn team_players(&self, team_id: u32) -> Vec<Player> {
        self.players.iter().filter(|p| p.team_id == team_id).cloned().collect()
    }

    fn team_not_found() -> StoreError {
        StoreError::NotFound("Team not found".into())
    }

    pub fn create_team(&mut self, new_team: NewTeam) -> Team {
        let now = Utc::now();
        let team = Team {
            id: next_id(self.teams.len()),
            name: new_team.name,
            logo: new_team.logo,
            founded: new_team.founded,
            address: new_team.address,
            city: new_team.city,
            players: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.teams.push(TeamRow { team: team.clone(), deleted_at: None });
        team
    }

    pub fn update_team(&mut self, id: u32, patch: TeamPatch) -> StoreResult<Team> {
        let row = self.live_team_mut(id).ok_or_else(Self::team_not_found)?;
        patch.apply(&mut row.team);
        row.team.updated_at = Utc::now();
        let mut team = row.team.clone();
        team.players = self.team_players(id);
        Ok(team)
    }

    /// Soft delete. Returns whether a live team was actually hidden; deleting
    /// an unknown or already deleted team is not an error.
    pub fn delete_team(&mut self, id: u32) -> bool {
        match self.live_team_mut(id) {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Live teams in id order, each with its roster.
    pub fn list_teams(&self) -> Vec<Team> {
        self.teams
            .iter()
            .filter(|row| row.is_live())
            .map(|row| {
                let mut team = row.team.clone();
                team.players = self.team_players(team.id);
                team
            })
            .collect()
    }

    pub fn create_player(&mut self, new_player: NewPlayer) -> StoreResult<Player> {
        if self.live_team(new_player.team_id).is_none() {
            return Err(Self::team_not_found());
        }
        let taken = self
            .players
            .iter()
            .any(|p| p.team_id == new_player.team_id && p.number == new_player.number);
        if taken {
            return Err(StoreError::Conflict("Player number already used in team".into()));
        }

        let player = Player {
            id: next_id(self.players.len()),
            name: new_player.name,
            height: new_player.height,
            weight: new_player.weight,
            position: new_player.position,
            number: new_player.number,
            team_id: new_player.team_id,
        };
        self.players.push(player.clone());
        Ok(player)
    }

    pub fn create_match(&mut self, new_match: NewMatch) -> StoreResult<Match> {
        if new_match.home_team_id == new_match.away_team_id {
            return Err(StoreError::Invalid("Teams cannot be the same".into()));
        }
        for team_id in [new_match.home_team_id, new_match.away_team_id] {
            if self.live_team(team_id).is_none() {
                return Err(StoreError::NotFound(format!("Team {team_id} not found")));
            }
        }

        let m = Match {
            id: next_id(self.matches.len()),
            date: new_match.date,
            time: new_match.time,
            home_team_id: new_match.home_team_id,
            away_team_id: new_match.away_team_id,
        };
        self.matches.push(m.clone());
        Ok(m)
    }

    pub fn record_result(&mut self, goal: NewGoalEvent) -> StoreResult<GoalEvent> {
        if !self.matches.iter().any(|m| m.id == goal.match_id) {
            return Err(StoreError::NotFound(format!("Match {} not found", goal.match_id)));
        }
        let event = GoalEvent {
            id: next_id(self.goals.len()),
            match_id: goal.match_id,
            home_score: goal.home_score,
            away_score: goal.away_score,
            scorer_name: goal.scorer_name,
            goal_minute: goal.goal_minute,
        };
        self.goals.push(event.clone());
        Ok(event)
    }

    /// Every match in ascending id order, with team names resolved and goal
    /// events in the order they were recorded. Teams that were soft deleted
    /// after the match was created resolve to no name.
    pub fn match_records(&self) -> Vec<MatchRecord> {
        let mut events_by_match: HashMap<u32, Vec<GoalEvent>> = HashMap::new();
        for goal in &self.goals {
            events_by_match.entry(goal.match_id).or_default().push(goal.clone());
        }

        self.matches
            .iter()
            .map(|m| MatchRecord {
                id: m.id,
                home: self.team_ref(m.home_team_id),
                away: self.team_ref(m.away_team_id),
                events: events_by_match.remove(&m.id).unwrap_or_default(),
            })
            .collect()
    }

    fn team_ref(&self, id: u32) -> TeamRef {
        TeamRef {
            id,
            name: self.live_team(id).map(|row| row.team.name.clone()),
        }
    }
}
