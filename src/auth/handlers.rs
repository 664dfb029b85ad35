use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, CreateUserRequest, LoginRequest, PublicUser, SetBalanceRequest},
        jwt::{AdminUser, AuthUser, JwtKeys},
        services::{authenticate, create_user},
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
    users::services::{list_users, require_user, update_user_balance},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin_list_users).post(admin_create_user))
        .route("/admin/users/:id/balance", put(admin_set_balance))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = payload.email.trim();
    let user = authenticate(&state.db, email, &payload.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let access_token = JwtKeys::from_ref(&state).sign(user.id)?;
    Ok(Json(AuthResponse {
        access_token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = require_user(&state.db, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, admin), fields(actor_id = admin.0.id))]
pub async fn admin_list_users(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = list_users(&state.db).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, admin, payload), fields(actor_id = admin.0.id))]
pub async fn admin_create_user(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let email = payload.email.trim();
    if !is_valid_email(email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation(format!("invalid email {email:?}")));
    }
    let user = create_user(&state.db, email, &payload.password, payload.is_admin).await?;
    info!(actor_id = admin.0.id, user_id = user.id, "account provisioned");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, admin, payload), fields(actor_id = admin.0.id))]
pub async fn admin_set_balance(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<i64>,
    AppJson(payload): AppJson<SetBalanceRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let user = update_user_balance(&state.db, admin.0.id, user_id, payload.balance).await?;
    Ok(Json(user.into()))
}
