//! Fixtures shared by the unit tests.

use sqlx::SqlitePool;

use crate::beverages::repo_types::Beverage;
use crate::money::Money;
use crate::users::repo_types::User;

pub(crate) async fn pool() -> SqlitePool {
    crate::db::connect("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// Insert a user directly; the password hash is a placeholder that never verifies.
pub(crate) async fn user(db: &SqlitePool, email: &str, is_admin: bool) -> User {
    User::insert(db, email, "$argon2id$placeholder", is_admin)
        .await
        .expect("insert user")
}

pub(crate) async fn user_with_balance(db: &SqlitePool, email: &str, cents: i64) -> User {
    let user = user(db, email, false).await;
    User::set_balance(db, user.id, Money::from_cents(cents))
        .await
        .expect("set balance")
        .expect("user exists")
}

pub(crate) async fn beverage(db: &SqlitePool, name: &str, price_cents: i64, stock: i64) -> Beverage {
    Beverage::insert(db, name, Money::from_cents(price_cents), stock)
        .await
        .expect("insert beverage")
}
