use crate::auth::{self, Claims};
use crate::error::ServerError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router, middleware};
use football_api::wire::MessageResponse;
use football_api::{
    GoalEvent, Match, NewGoalEvent, NewMatch, NewPlayer, NewTeam, Player, ReportEntry, Team,
    TeamPatch, build_reports,
};
use log::{debug, info};

type Payload<T> = Result<Json<T>, JsonRejection>;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/teams", post(create_team))
        .route("/teams/{id}", put(update_team).delete(delete_team))
        .route("/players", post(create_player))
        .route("/matches", post(create_match))
        .route("/matches/result", post(report_result))
        .route("/reports", get(reports))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/teams", get(list_teams))
        .merge(protected)
        .with_state(state)
}

async fn list_teams(State(state): State<AppState>) -> Json<Vec<Team>> {
    Json(state.store.read().await.list_teams())
}

async fn create_team(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Payload<NewTeam>,
) -> Result<Json<Team>, ServerError> {
    let Json(new_team) = payload?;
    let team = state.store.write().await.create_team(new_team);
    info!("team {} ({}) created by {}", team.id, team.name, claims.username);
    Ok(Json(team))
}

async fn update_team(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<u32>, PathRejection>,
    payload: Payload<TeamPatch>,
) -> Result<Json<Team>, ServerError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let team = state.store.write().await.update_team(id, patch)?;
    info!("team {id} updated by {}", claims.username);
    Ok(Json(team))
}

async fn delete_team(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<MessageResponse>, ServerError> {
    let Path(id) = id?;
    if state.store.write().await.delete_team(id) {
        info!("team {id} soft deleted by {}", claims.username);
    } else {
        debug!("delete of team {id} was a no-op");
    }
    Ok(Json(MessageResponse { message: "Team soft deleted".into() }))
}

async fn create_player(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Payload<NewPlayer>,
) -> Result<Json<Player>, ServerError> {
    let Json(new_player) = payload?;
    let player = state.store.write().await.create_player(new_player)?;
    info!(
        "player {} (#{}) added to team {} by {}",
        player.name, player.number, player.team_id, claims.username
    );
    Ok(Json(player))
}

async fn create_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Payload<NewMatch>,
) -> Result<Json<Match>, ServerError> {
    let Json(new_match) = payload?;
    let m = state.store.write().await.create_match(new_match)?;
    info!(
        "match {} scheduled: {} vs {} by {}",
        m.id, m.home_team_id, m.away_team_id, claims.username
    );
    Ok(Json(m))
}

async fn report_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Payload<NewGoalEvent>,
) -> Result<Json<GoalEvent>, ServerError> {
    let Json(goal) = payload?;
    let event = state.store.write().await.record_result(goal)?;
    info!(
        "goal by {} in match {} ({}-{}) recorded by {}",
        event.scorer_name, event.match_id, event.home_score, event.away_score, claims.username
    );
    Ok(Json(event))
}

async fn reports(State(state): State<AppState>) -> Json<Vec<ReportEntry>> {
    // Release the lock before aggregating.
    let records = state.store.read().await.match_records();
    let reports = build_reports(&records);
    debug!("built {} report entries", reports.len());
    Json(reports)
}
