use anyhow::Context;
use chrono::TimeDelta;

pub const BIND_VAR: &str = "FOOTBALL_BIND";
pub const JWT_SECRET_VAR: &str = "FOOTBALL_JWT_SECRET";
pub const TOKEN_TTL_VAR: &str = "FOOTBALL_TOKEN_TTL_MINUTES";
pub const ADMIN_USERNAME_VAR: &str = "FOOTBALL_ADMIN_USERNAME";
pub const ADMIN_PASSWORD_VAR: &str = "FOOTBALL_ADMIN_PASSWORD";
pub const BCRYPT_COST_VAR: &str = "FOOTBALL_BCRYPT_COST";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_JWT_SECRET: &str = "secret_key";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 120;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub jwt_secret: String,
    pub token_ttl: TimeDelta,
    /// Seeded on startup when no admin exists yet.
    pub admin_username: String,
    pub admin_password: String,
    pub bcrypt_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl: TimeDelta::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let token_ttl = match get(TOKEN_TTL_VAR) {
            Some(raw) => {
                let minutes: i64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {TOKEN_TTL_VAR}: {raw:?}"))?;
                anyhow::ensure!(minutes > 0, "{TOKEN_TTL_VAR} must be positive, got {minutes}");
                TimeDelta::try_minutes(minutes)
                    .with_context(|| format!("{TOKEN_TTL_VAR} out of range: {minutes}"))?
            }
            None => defaults.token_ttl,
        };

        let bcrypt_cost = match get(BCRYPT_COST_VAR) {
            Some(raw) => {
                let cost: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {BCRYPT_COST_VAR}: {raw:?}"))?;
                anyhow::ensure!(
                    (4..=31).contains(&cost),
                    "{BCRYPT_COST_VAR} must be between 4 and 31, got {cost}"
                );
                cost
            }
            None => defaults.bcrypt_cost,
        };

        Ok(Self {
            bind: get(BIND_VAR).unwrap_or(defaults.bind),
            jwt_secret: get(JWT_SECRET_VAR).unwrap_or(defaults.jwt_secret),
            token_ttl,
            admin_username: get(ADMIN_USERNAME_VAR).unwrap_or(defaults.admin_username),
            admin_password: get(ADMIN_PASSWORD_VAR).unwrap_or(defaults.admin_password),
            bcrypt_cost,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
