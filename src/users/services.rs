use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::money::Money;
use crate::users::repo_types::User;

pub async fn get_user(db: &SqlitePool, id: i64) -> Result<Option<User>> {
    Ok(User::find_by_id(db, id).await?)
}

pub async fn get_user_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>> {
    Ok(User::find_by_email(db, email).await?)
}

/// Like [`get_user`] but a missing user is an error.
pub async fn require_user(db: &SqlitePool, id: i64) -> Result<User> {
    get_user(db, id)
        .await?
        .ok_or(AppError::NotFound { entity: "user", id })
}

pub async fn list_users(db: &SqlitePool) -> Result<Vec<User>> {
    Ok(User::list(db).await?)
}

/// Admin override: overwrite the balance without writing a transaction row.
///
/// The change is only visible in the log, not in the user's history.
#[instrument(skip(db))]
pub async fn update_user_balance(
    db: &SqlitePool,
    actor_id: i64,
    user_id: i64,
    new_balance: Money,
) -> Result<User> {
    let mut tx = db.begin().await?;
    let previous = User::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or(AppError::NotFound { entity: "user", id: user_id })?;
    let user = User::set_balance(&mut *tx, user_id, new_balance)
        .await?
        .ok_or(AppError::NotFound { entity: "user", id: user_id })?;
    tx.commit().await?;

    info!(
        actor_id,
        user_id,
        old_balance = %previous.balance,
        new_balance = %user.balance,
        "balance overridden"
    );
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::repo_types::Transaction;
    use crate::testing;

    #[tokio::test]
    async fn admin_sets_balance_without_transaction_row() {
        let db = testing::pool().await;
        let admin = testing::user(&db, "admin@matekasse.de", true).await;
        let user = testing::user(&db, "user@matekasse.de", false).await;

        let updated = update_user_balance(&db, admin.id, user.id, "25".parse().unwrap())
            .await
            .expect("override");

        assert_eq!(updated.balance, Money::from_cents(2500));
        let reloaded = require_user(&db, user.id).await.unwrap();
        assert_eq!(reloaded.balance, Money::from_cents(2500));
        let history = Transaction::list_for_user(&db, user.id).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn override_of_unknown_user_is_not_found() {
        let db = testing::pool().await;
        let err = update_user_balance(&db, 1, 999, Money::from_cents(100))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "user", id: 999 }));
    }

    #[tokio::test]
    async fn lookups_by_id_and_email() {
        let db = testing::pool().await;
        let user = testing::user(&db, "user@matekasse.de", false).await;

        let by_id = get_user(&db, user.id).await.unwrap().expect("by id");
        assert_eq!(by_id.email, "user@matekasse.de");
        assert!(by_id.is_active);
        assert_eq!(by_id.balance, Money::ZERO);

        assert!(get_user_by_email(&db, "user@matekasse.de").await.unwrap().is_some());
        assert!(get_user_by_email(&db, "USER@matekasse.de").await.unwrap().is_none());
        assert!(get_user(&db, user.id + 1).await.unwrap().is_none());
        assert!(matches!(
            require_user(&db, user.id + 1).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn lists_users_in_creation_order() {
        let db = testing::pool().await;
        testing::user(&db, "b@matekasse.de", false).await;
        testing::user(&db, "a@matekasse.de", true).await;

        let emails: Vec<_> = list_users(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["b@matekasse.de", "a@matekasse.de"]);
    }
}
