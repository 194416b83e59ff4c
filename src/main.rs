mod auth;
mod error;
mod routes;
mod state;

use crate::state::AppState;
use crate::state::settings::Settings;
use anyhow::Context;
use env_logger::Env;
use log::{info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;
    if settings.uses_default_secret() {
        warn!("signing tokens with the built-in JWT secret; set FOOTBALL_JWT_SECRET");
    }

    let state = AppState::new(settings);
    if auth::seed_default_admin(&state).await? {
        info!("Default admin created: username={}", state.settings.admin_username);
    }

    let listener = TcpListener::bind(&state.settings.bind)
        .await
        .with_context(|| format!("could not bind {}", state.settings.bind))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, routes::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("football {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "football - REST service for teams, players, matches and match reports

Usage:
  football
  football --help
  football --version

Environment:
  FOOTBALL_BIND               Listen address (default 0.0.0.0:8080)
  FOOTBALL_JWT_SECRET         HS256 signing secret for login tokens
  FOOTBALL_TOKEN_TTL_MINUTES  Token lifetime in minutes (default 120)
  FOOTBALL_ADMIN_USERNAME     Admin seeded on first start (default admin)
  FOOTBALL_ADMIN_PASSWORD     Password for the seeded admin (default admin123)
  FOOTBALL_BCRYPT_COST        bcrypt cost for password hashes (default 12)
  RUST_LOG                    Log filter (default info)"
}
