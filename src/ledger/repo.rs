use sqlx::SqliteExecutor;
use time::OffsetDateTime;

use crate::ledger::repo_types::{NewTransaction, Transaction, TransactionStatus};

impl Transaction {
    pub async fn insert<'e, E>(
        db: E,
        new: &NewTransaction,
        timestamp: OffsetDateTime,
    ) -> sqlx::Result<Transaction>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, beverage_id, amount, type, status, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, beverage_id, amount, type, status, timestamp
            "#,
        )
        .bind(new.user_id)
        .bind(new.beverage_id)
        .bind(new.amount)
        .bind(new.kind)
        .bind(new.status)
        .bind(timestamp)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id<'e, E>(db: E, id: i64) -> sqlx::Result<Option<Transaction>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, beverage_id, amount, type, status, timestamp
              FROM transactions
             WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Newest first. Stored RFC 3339 text varies in width, so order on its julian day.
    pub async fn list_for_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<Vec<Transaction>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, beverage_id, amount, type, status, timestamp
              FROM transactions
             WHERE user_id = ?
             ORDER BY julianday(timestamp) DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Oldest first, so the admin queue is worked in arrival order.
    pub async fn list_pending<'e, E>(db: E) -> sqlx::Result<Vec<Transaction>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, beverage_id, amount, type, status, timestamp
              FROM transactions
             WHERE status = ?
             ORDER BY julianday(timestamp) ASC, id ASC
            "#,
        )
        .bind(TransactionStatus::Pending)
        .fetch_all(db)
        .await
    }

    /// Flip a pending row to confirmed. `None` if it is missing or no longer pending.
    pub async fn mark_confirmed<'e, E>(db: E, id: i64) -> sqlx::Result<Option<Transaction>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
               SET status = ?
             WHERE id = ? AND status = ?
            RETURNING id, user_id, beverage_id, amount, type, status, timestamp
            "#,
        )
        .bind(TransactionStatus::Confirmed)
        .bind(id)
        .bind(TransactionStatus::Pending)
        .fetch_optional(db)
        .await
    }
}
