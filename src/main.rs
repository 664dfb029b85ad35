use matekasse::{app, auth::services::ensure_admin, state::AppState};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL")
            .map(|v| v.to_lowercase())
            .ok()
            .filter(|v| LOG_LEVELS.contains(&v.as_str()))
            .unwrap_or_else(|| "info".into());
        format!("matekasse={level},axum=info,tower_http=info")
    });
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::init().await?;
    ensure_admin(&state.db, &state.config.admin).await?;

    app::serve(app::build_app(state)).await
}
