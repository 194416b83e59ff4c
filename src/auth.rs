use crate::error::ServerError;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{TimeDelta, Utc};
use football_api::wire::{LoginRequest, TokenResponse};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, ServerError> {
    bcrypt::hash(password, cost).map_err(|e| ServerError::Internal(format!("hashing failed: {e}")))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// HS256 token for `username`, valid for `ttl` from now.
pub fn issue_token(username: &str, secret: &str, ttl: TimeDelta) -> Result<String, ServerError> {
    let claims = Claims { username: username.to_owned(), exp: (Utc::now() + ttl).timestamp() };
    jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| ServerError::Internal(format!("token signing failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Create the configured admin when the store has none. Returns whether one was created.
pub async fn seed_default_admin(state: &AppState) -> Result<bool, ServerError> {
    let settings = &state.settings;
    if state.store.read().await.admin_count() > 0 {
        return Ok(false);
    }
    let hash = hash_password(&settings.admin_password, settings.bcrypt_cost)?;
    let mut store = state.store.write().await;
    if store.admin_count() > 0 {
        return Ok(false);
    }
    store.create_admin(&settings.admin_username, hash)?;
    Ok(true)
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ServerError> {
    let Ok(Json(input)) = payload else {
        return Err(ServerError::BadRequest("Invalid JSON".into()));
    };

    let password_hash = {
        let store = state.store.read().await;
        match store.find_admin(&input.username) {
            Some(admin) => admin.password_hash.clone(),
            None => {
                warn!("login rejected: unknown user {:?}", input.username);
                return Err(ServerError::Unauthorized("Invalid username".into()));
            }
        }
    };

    // bcrypt verification is CPU bound, run it on the blocking pool
    let password = input.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| ServerError::Internal(format!("password check failed: {e}")))?;
    if !matches {
        warn!("login rejected: bad password for {:?}", input.username);
        return Err(ServerError::Unauthorized("Invalid password".into()));
    }

    let token = issue_token(&input.username, &state.settings.jwt_secret, state.settings.token_ttl)?;
    info!("admin {} logged in", input.username);
    Ok(Json(TokenResponse { token }))
}

/// Route layer guarding write routes. Expects `Authorization: Bearer <token>`
/// and makes the verified [`Claims`] available as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let Some(token) = header_value.strip_prefix("Bearer ").filter(|t| !t.is_empty()) else {
        warn!("{} {}: missing bearer token", request.method(), request.uri().path());
        return Err(ServerError::Unauthorized("Missing or invalid token".into()));
    };

    let claims = verify_token(token, &state.settings.jwt_secret).map_err(|e| {
        warn!("rejected token: {e}");
        ServerError::Unauthorized("Invalid token".into())
    })?;
    debug!("{} {} as {}", request.method(), request.uri().path(), claims.username);

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
