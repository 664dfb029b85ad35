use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::beverages::repo_types::Beverage;
use crate::error::{AppError, Result};
use crate::ledger::repo_types::{NewTransaction, Transaction, TransactionStatus, TransactionType};
use crate::money::Money;
use crate::users::repo_types::User;

/// Outcome of a successful purchase.
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub transaction: Transaction,
    pub beverage: Beverage,
    pub balance: Money,
}

/// Add `amount` to `user`'s balance, refusing results outside the i64 cent range.
async fn credit(conn: &mut SqliteConnection, user: &User, amount: Money) -> Result<Money> {
    if user.balance.checked_add(amount).is_none() {
        warn!(user_id = user.id, balance = %user.balance, %amount, "balance overflow");
        return Err(AppError::Validation(format!(
            "balance of user {} cannot absorb {amount}",
            user.id
        )));
    }
    User::add_to_balance(&mut *conn, user.id, amount)
        .await?
        .ok_or(AppError::NotFound { entity: "user", id: user.id })
}

/// Insert `new` and, when it is confirmed, apply it to the owner's balance.
///
/// Runs on the caller's connection so it joins whatever transaction is open.
/// Returns the row and the owner's balance afterwards.
async fn record_transaction(
    conn: &mut SqliteConnection,
    new: &NewTransaction,
) -> Result<(Transaction, Money)> {
    let user = User::find_by_id(&mut *conn, new.user_id)
        .await?
        .ok_or(AppError::NotFound { entity: "user", id: new.user_id })?;

    let transaction = Transaction::insert(&mut *conn, new, OffsetDateTime::now_utc()).await?;

    let balance = match new.status {
        TransactionStatus::Confirmed => credit(&mut *conn, &user, new.amount).await?,
        TransactionStatus::Pending => user.balance,
    };

    debug!(
        transaction_id = transaction.id,
        user_id = user.id,
        amount = %transaction.amount,
        kind = ?transaction.kind,
        status = ?transaction.status,
        %balance,
        "transaction recorded"
    );
    Ok((transaction, balance))
}

/// Record a ledger row. Confirmed rows move the balance by `amount` in the same
/// database transaction; pending rows leave it alone.
///
/// The sign of `amount` is not checked against `kind`.
#[instrument(skip(db))]
pub async fn create_transaction(db: &SqlitePool, new: NewTransaction) -> Result<Transaction> {
    let mut tx = db.begin().await?;
    let (transaction, _) = record_transaction(&mut *tx, &new).await?;
    tx.commit().await?;
    Ok(transaction)
}

/// Confirm a pending transaction and credit its amount to the owner.
#[instrument(skip(db))]
pub async fn confirm_transaction(db: &SqlitePool, transaction_id: i64) -> Result<Transaction> {
    let mut tx = db.begin().await?;

    // Guarded on status = pending, so a concurrent confirm cannot apply twice.
    let Some(confirmed) = Transaction::mark_confirmed(&mut *tx, transaction_id).await? else {
        return Err(match Transaction::find_by_id(&mut *tx, transaction_id).await? {
            Some(_) => {
                warn!(transaction_id, "transaction already confirmed");
                AppError::InvalidState(format!("transaction {transaction_id} already confirmed"))
            }
            None => AppError::NotFound { entity: "transaction", id: transaction_id },
        });
    };
    let owner = User::find_by_id(&mut *tx, confirmed.user_id)
        .await?
        .ok_or(AppError::NotFound { entity: "user", id: confirmed.user_id })?;
    let balance = credit(&mut *tx, &owner, confirmed.amount).await?;

    tx.commit().await?;

    info!(
        transaction_id,
        user_id = confirmed.user_id,
        amount = %confirmed.amount,
        %balance,
        "transaction confirmed"
    );
    Ok(confirmed)
}

/// Buy one unit of a beverage.
///
/// The debit and the stock decrement commit together or not at all.
#[instrument(skip(db))]
pub async fn purchase(db: &SqlitePool, user_id: i64, beverage_id: i64) -> Result<Purchase> {
    let mut tx = db.begin().await?;

    let user = User::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or(AppError::NotFound { entity: "user", id: user_id })?;
    let beverage = Beverage::find_by_id(&mut *tx, beverage_id)
        .await?
        .ok_or(AppError::NotFound { entity: "beverage", id: beverage_id })?;

    if user.balance < beverage.price {
        warn!(user_id, beverage_id, balance = %user.balance, price = %beverage.price, "insufficient funds");
        return Err(AppError::InsufficientFunds {
            balance: user.balance,
            price: beverage.price,
        });
    }
    // Guarded on stock > 0.
    let Some(beverage) = Beverage::take_one(&mut *tx, beverage_id).await? else {
        warn!(user_id, beverage_id, "out of stock");
        return Err(AppError::OutOfStock { name: beverage.name });
    };

    let new = NewTransaction {
        beverage_id: Some(beverage.id),
        ..NewTransaction::new(
            user.id,
            -beverage.price,
            TransactionType::Purchase,
            TransactionStatus::Confirmed,
        )
    };
    let (transaction, balance) = record_transaction(&mut *tx, &new).await?;

    tx.commit().await?;

    info!(
        user_id,
        beverage_id,
        transaction_id = transaction.id,
        price = %beverage.price,
        %balance,
        stock = beverage.stock,
        "beverage purchased"
    );
    Ok(Purchase {
        transaction,
        beverage,
        balance,
    })
}

/// Record a deposit awaiting admin confirmation. The balance is untouched
/// until [`confirm_transaction`] runs.
#[instrument(skip(db))]
pub async fn request_deposit(db: &SqlitePool, user_id: i64, amount: Money) -> Result<Transaction> {
    if !amount.is_positive() {
        return Err(AppError::Validation(format!(
            "deposit amount must be positive: {amount}"
        )));
    }
    let transaction = create_transaction(
        db,
        NewTransaction::new(
            user_id,
            amount,
            TransactionType::Deposit,
            TransactionStatus::Pending,
        ),
    )
    .await?;
    info!(user_id, transaction_id = transaction.id, %amount, "deposit requested");
    Ok(transaction)
}

/// History of one user, newest first.
pub async fn transactions_for_user(db: &SqlitePool, user_id: i64) -> Result<Vec<Transaction>> {
    Ok(Transaction::list_for_user(db, user_id).await?)
}

pub async fn pending_transactions(db: &SqlitePool) -> Result<Vec<Transaction>> {
    Ok(Transaction::list_pending(db).await?)
}
