use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::config::AdminBootstrap;
use crate::error::{AppError, Result};
use crate::users::repo_types::User;

/// Look up `email` and check `password`. `None` for an unknown email or a
/// wrong password; the two cases are not distinguished to the caller.
#[instrument(skip(db, password))]
pub async fn authenticate(db: &SqlitePool, email: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = User::find_by_email(db, email).await? else {
        warn!(%email, "login unknown email");
        return Ok(None);
    };
    if !verify_password(password, &user.password_hash)? {
        warn!(%email, user_id = user.id, "login invalid password");
        return Ok(None);
    }
    info!(user_id = user.id, %email, "login succeeded");
    Ok(Some(user))
}

/// Provision a user with a zero balance. Any password string is accepted.
#[instrument(skip(db, password))]
pub async fn create_user(
    db: &SqlitePool,
    email: &str,
    password: &str,
    is_admin: bool,
) -> Result<User> {
    if User::find_by_email(db, email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict(format!("email {email} already registered")));
    }

    let hash = hash_password(password)?;
    let user = User::insert(db, email, &hash, is_admin)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, format!("email {email} already registered")))?;

    info!(user_id = user.id, email = %user.email, is_admin, "user created");
    Ok(user)
}

/// Create the bootstrap admin unless a user with that email exists.
pub async fn ensure_admin(db: &SqlitePool, admin: &AdminBootstrap) -> Result<User> {
    if let Some(existing) = User::find_by_email(db, &admin.email).await? {
        if !existing.is_admin {
            warn!(email = %admin.email, "bootstrap admin email belongs to a non-admin user");
        }
        return Ok(existing);
    }
    let user = create_user(db, &admin.email, &admin.password, true).await?;
    info!(user_id = user.id, email = %user.email, "bootstrap admin created");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::testing;
    use crate::users::services::list_users;

    #[tokio::test]
    async fn created_user_can_log_in() {
        let db = testing::pool().await;
        let created = create_user(&db, "user@matekasse.de", "user", false)
            .await
            .unwrap();
        assert_eq!(created.balance, Money::ZERO);
        assert!(!created.is_admin);
        assert_ne!(created.password_hash, "user");

        let user = authenticate(&db, "user@matekasse.de", "user")
            .await
            .unwrap()
            .expect("valid credentials");
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_email_yield_none() {
        let db = testing::pool().await;
        create_user(&db, "user@matekasse.de", "user", false).await.unwrap();

        assert!(authenticate(&db, "user@matekasse.de", "nope").await.unwrap().is_none());
        assert!(authenticate(&db, "ghost@matekasse.de", "user").await.unwrap().is_none());
        // email match is exact
        assert!(authenticate(&db, "User@matekasse.de", "user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict_and_adds_no_row() {
        let db = testing::pool().await;
        create_user(&db, "user@matekasse.de", "user", false).await.unwrap();

        let err = create_user(&db, "user@matekasse.de", "other", true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
        assert_eq!(list_users(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let db = testing::pool().await;
        let bootstrap = AdminBootstrap {
            email: "admin@matekasse.de".into(),
            password: "admin".into(),
        };

        let first = ensure_admin(&db, &bootstrap).await.unwrap();
        let second = ensure_admin(&db, &bootstrap).await.unwrap();

        assert!(first.is_admin);
        assert_eq!(first.id, second.id);
        assert_eq!(list_users(&db).await.unwrap().len(), 1);
        assert!(authenticate(&db, "admin@matekasse.de", "admin").await.unwrap().is_some());
    }
}
