use sqlx::SqliteExecutor;
use time::OffsetDateTime;

use crate::money::Money;
use crate::users::repo_types::User;

const USER_COLUMNS: &str = "id, email, password_hash, balance, is_admin, is_active, created_at";

impl User {
    pub async fn find_by_id<'e, E>(db: E, id: i64) -> sqlx::Result<Option<User>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Exact, case-sensitive lookup.
    pub async fn find_by_email<'e, E>(db: E, email: &str) -> sqlx::Result<Option<User>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn list<'e, E>(db: E) -> sqlx::Result<Vec<User>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(db)
            .await
    }

    /// Insert a user with a zero balance.
    pub async fn insert<'e, E>(
        db: E,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> sqlx::Result<User>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, balance, is_admin, is_active, created_at)
            VALUES (?, ?, 0, ?, 1, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// Overwrite the balance. `None` when the user does not exist.
    pub async fn set_balance<'e, E>(db: E, id: i64, balance: Money) -> sqlx::Result<Option<User>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET balance = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(balance)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Add `delta` to the stored balance and return the new value.
    pub async fn add_to_balance<'e, E>(db: E, id: i64, delta: Money) -> sqlx::Result<Option<Money>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_scalar::<_, Money>(
            "UPDATE users SET balance = balance + ? WHERE id = ? RETURNING balance",
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
