use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::beverages::repo_types::{Beverage, BeverageChanges};
use crate::error::{AppError, Result};
use crate::money::Money;

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("beverage name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn validate_price(price: Money) -> Result<Money> {
    if price.is_negative() {
        return Err(AppError::Validation(format!("price must not be negative: {price}")));
    }
    Ok(price)
}

fn validate_stock(stock: i64) -> Result<i64> {
    if stock < 0 {
        return Err(AppError::Validation(format!("stock must not be negative: {stock}")));
    }
    Ok(stock)
}

pub async fn list_beverages(db: &SqlitePool) -> Result<Vec<Beverage>> {
    Ok(Beverage::list(db).await?)
}

pub async fn get_beverage(db: &SqlitePool, id: i64) -> Result<Beverage> {
    Beverage::find_by_id(db, id)
        .await?
        .ok_or(AppError::NotFound { entity: "beverage", id })
}

#[instrument(skip(db))]
pub async fn create_beverage(
    db: &SqlitePool,
    name: &str,
    price: Money,
    stock: i64,
) -> Result<Beverage> {
    let name = validate_name(name)?;
    let price = validate_price(price)?;
    let stock = validate_stock(stock)?;

    let beverage = Beverage::insert(db, &name, price, stock)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, format!("beverage {name:?} already exists")))?;

    info!(beverage_id = beverage.id, name = %beverage.name, price = %beverage.price, stock, "beverage created");
    Ok(beverage)
}

/// Direct overwrite of name, price or stock; never recorded as a transaction.
#[instrument(skip(db))]
pub async fn update_beverage(
    db: &SqlitePool,
    actor_id: i64,
    id: i64,
    changes: BeverageChanges,
) -> Result<Beverage> {
    let changes = BeverageChanges {
        name: changes.name.as_deref().map(validate_name).transpose()?,
        price: changes.price.map(validate_price).transpose()?,
        stock: changes.stock.map(validate_stock).transpose()?,
    };

    let mut tx = db.begin().await?;
    let previous = Beverage::find_by_id(&mut *tx, id)
        .await?
        .ok_or(AppError::NotFound { entity: "beverage", id })?;
    if changes.is_empty() {
        return Ok(previous);
    }
    let beverage = Beverage::update(&mut *tx, id, &changes)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(
                e,
                format!("beverage {:?} already exists", changes.name.as_deref().unwrap_or_default()),
            )
        })?
        .ok_or(AppError::NotFound { entity: "beverage", id })?;
    tx.commit().await?;

    info!(
        actor_id,
        beverage_id = id,
        old_name = %previous.name,
        new_name = %beverage.name,
        old_price = %previous.price,
        new_price = %beverage.price,
        old_stock = previous.stock,
        new_stock = beverage.stock,
        "beverage overridden"
    );
    Ok(beverage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn creates_and_lists_by_name() {
        let db = testing::pool().await;
        create_beverage(&db, "Mate", Money::from_cents(150), 20).await.unwrap();
        let cola = create_beverage(&db, "  Cola ", Money::from_cents(200), 10)
            .await
            .unwrap();
        assert_eq!(cola.name, "Cola");

        let names: Vec<_> = list_beverages(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Cola", "Mate"]);
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let db = testing::pool().await;
        create_beverage(&db, "Mate", Money::from_cents(150), 20).await.unwrap();
        let err = create_beverage(&db, "Mate", Money::from_cents(100), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
        assert_eq!(list_beverages(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_negative_price_stock_and_blank_name() {
        let db = testing::pool().await;
        for (name, price, stock) in [("Mate", -1, 1), ("Mate", 100, -1), ("   ", 100, 1)] {
            let err = create_beverage(&db, name, Money::from_cents(price), stock)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{err:?}");
        }
        assert!(list_beverages(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let db = testing::pool().await;
        let mate = testing::beverage(&db, "Mate", 150, 20).await;

        let updated = update_beverage(
            &db,
            1,
            mate.id,
            BeverageChanges {
                stock: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.stock, 5);
        assert_eq!(updated.name, "Mate");
        assert_eq!(updated.price, Money::from_cents(150));

        let renamed = update_beverage(
            &db,
            1,
            mate.id,
            BeverageChanges {
                name: Some("Club-Mate".into()),
                price: Some(Money::from_cents(180)),
                stock: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Club-Mate");
        assert_eq!(renamed.price, Money::from_cents(180));
        assert_eq!(renamed.stock, 5);
    }

    #[tokio::test]
    async fn update_errors() {
        let db = testing::pool().await;
        let mate = testing::beverage(&db, "Mate", 150, 20).await;
        testing::beverage(&db, "Cola", 200, 10).await;

        let missing = update_beverage(&db, 1, 999, BeverageChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::NotFound { entity: "beverage", id: 999 }));

        let negative = update_beverage(
            &db,
            1,
            mate.id,
            BeverageChanges {
                stock: Some(-3),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(negative, AppError::Validation(_)));

        let taken = update_beverage(
            &db,
            1,
            mate.id,
            BeverageChanges {
                name: Some("Cola".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(taken, AppError::Conflict(_)));
        assert_eq!(get_beverage(&db, mate.id).await.unwrap().name, "Mate");
    }
}
