use crate::wire::{ErrorResponse, LoginRequest, MessageResponse, TokenResponse};
use crate::{
    GoalEvent, Match, NewGoalEvent, NewMatch, NewPlayer, NewTeam, Player, ReportEntry, Team,
    TeamPatch,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Typed client for the football league service.
///
/// Write routes and `/reports` need a bearer token: call [`FootballApi::login`]
/// first or build the client with [`FootballApi::with_token`].
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl Default for FootballApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api { status: u16, message: String, url: String },
    Parsing(reqwest::Error, String),
    Unauthorized(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api { status, message, url } => {
                write!(f, "API error {status} for {url}: {message}")
            }
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl FootballApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("football-api/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Exchange admin credentials for a token and keep it for later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> ApiResult<String> {
        let body = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        let resp: TokenResponse = self.send(Method::POST, "/auth/login", Some(&body)).await?;
        self.token = Some(resp.token.clone());
        Ok(resp.token)
    }

    pub async fn list_teams(&self) -> ApiResult<Vec<Team>> {
        self.send::<(), _>(Method::GET, "/teams", None).await
    }

    pub async fn create_team(&self, team: &NewTeam) -> ApiResult<Team> {
        self.send(Method::POST, "/teams", Some(team)).await
    }

    pub async fn update_team(&self, id: u32, patch: &TeamPatch) -> ApiResult<Team> {
        self.send(Method::PUT, &format!("/teams/{id}"), Some(patch)).await
    }

    pub async fn delete_team(&self, id: u32) -> ApiResult<String> {
        let resp: MessageResponse = self
            .send::<(), _>(Method::DELETE, &format!("/teams/{id}"), None)
            .await?;
        Ok(resp.message)
    }

    pub async fn create_player(&self, player: &NewPlayer) -> ApiResult<Player> {
        self.send(Method::POST, "/players", Some(player)).await
    }

    pub async fn create_match(&self, new_match: &NewMatch) -> ApiResult<Match> {
        self.send(Method::POST, "/matches", Some(new_match)).await
    }

    pub async fn report_result(&self, goal: &NewGoalEvent) -> ApiResult<GoalEvent> {
        self.send(Method::POST, "/matches/result", Some(goal)).await
    }

    /// Fetch the per-match report with running win totals.
    pub async fn fetch_reports(&self) -> ApiResult<Vec<ReportEntry>> {
        self.send::<(), _>(Method::GET, "/reports", None).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);
        let mut request: RequestBuilder = self.client.request(method, &url).timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url));
        }

        // Error bodies are `{"error": "..."}`; fall back to the reason phrase.
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
        };
        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Unauthorized(message))
        } else {
            Err(ApiError::Api { status: status.as_u16(), message, url })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchStatus;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn login_stores_token_for_later_calls() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({"username": "admin", "password": "admin123"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"abc.def.ghi"}"#)
            .create_async()
            .await;
        let reports = server
            .mock("GET", "/reports")
            .match_header("authorization", "Bearer abc.def.ghi")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let mut api = FootballApi::new(server.url());
        let token = api.login("admin", "admin123").await.unwrap();
        assert_eq!(token, "abc.def.ghi");
        assert_eq!(api.token(), Some("abc.def.ghi"));
        assert!(api.fetch_reports().await.unwrap().is_empty());

        login.assert_async().await;
        reports.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_reports_decodes_entries() {
        let mut server = mockito::Server::new_async().await;
        let body = json!([{
            "match_id": 4,
            "home_team": "Rovers",
            "away_team": "United",
            "home_score": 2,
            "away_score": 1,
            "status": "Home Win",
            "top_scorer": "Ada",
            "home_total_wins": 3,
            "away_total_wins": 0
        }]);
        let _m = server
            .mock("GET", "/reports")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = FootballApi::new(server.url()).with_token("t");
        let reports = api.fetch_reports().await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, MatchStatus::HomeWin);
        assert_eq!(reports[0].top_scorer, "Ada");
        assert_eq!(reports[0].home_total_wins, 3);
    }

    #[tokio::test]
    async fn unauthorized_response_maps_to_unauthorized_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/teams")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Missing or invalid token"}"#)
            .create_async()
            .await;

        let api = FootballApi::new(server.url());
        let err = api
            .create_team(&NewTeam { name: "Rovers".into(), ..Default::default() })
            .await
            .unwrap_err();
        match err {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Missing or invalid token"),
            other => panic!("expected Unauthorized, got {other}"),
        }
    }

    #[tokio::test]
    async fn error_body_becomes_api_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/matches")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Teams cannot be the same"}"#)
            .create_async()
            .await;

        let api = FootballApi::new(server.url()).with_token("t");
        let new_match = NewMatch {
            date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            time: chrono::NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            home_team_id: 1,
            away_team_id: 1,
        };
        match api.create_match(&new_match).await.unwrap_err() {
            ApiError::Api { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Teams cannot be the same");
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_falls_back_to_reason_phrase() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/teams/3")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let api = FootballApi::new(format!("{}/", server.url())).with_token("t");
        match api.delete_team(3).await.unwrap_err() {
            ApiError::Api { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = FootballApi::new("http://localhost:9000/");
        assert_eq!(api.base_url, "http://localhost:9000");
        assert!(api.token().is_none());
    }
}
