use sqlx::SqliteExecutor;

use crate::beverages::repo_types::{Beverage, BeverageChanges};
use crate::money::Money;

impl Beverage {
    pub async fn find_by_id<'e, E>(db: E, id: i64) -> sqlx::Result<Option<Beverage>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Beverage>("SELECT id, name, price, stock FROM beverages WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list<'e, E>(db: E) -> sqlx::Result<Vec<Beverage>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Beverage>("SELECT id, name, price, stock FROM beverages ORDER BY name")
            .fetch_all(db)
            .await
    }

    pub async fn insert<'e, E>(db: E, name: &str, price: Money, stock: i64) -> sqlx::Result<Beverage>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Beverage>(
            r#"
            INSERT INTO beverages (name, price, stock)
            VALUES (?, ?, ?)
            RETURNING id, name, price, stock
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(stock)
        .fetch_one(db)
        .await
    }

    /// Apply the set fields of `changes`. `None` when the beverage does not exist.
    pub async fn update<'e, E>(
        db: E,
        id: i64,
        changes: &BeverageChanges,
    ) -> sqlx::Result<Option<Beverage>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Beverage>(
            r#"
            UPDATE beverages
               SET name  = COALESCE(?, name),
                   price = COALESCE(?, price),
                   stock = COALESCE(?, stock)
             WHERE id = ?
            RETURNING id, name, price, stock
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.price)
        .bind(changes.stock)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Take one unit out of stock. `None` when the beverage is missing or sold out.
    pub async fn take_one<'e, E>(db: E, id: i64) -> sqlx::Result<Option<Beverage>>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Beverage>(
            r#"
            UPDATE beverages
               SET stock = stock - 1
             WHERE id = ? AND stock > 0
            RETURNING id, name, price, stock
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
