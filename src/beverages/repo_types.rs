use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Beverage {
    pub id: i64,
    pub name: String,
    pub price: Money,
    pub stock: i64,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BeverageChanges {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
}

impl BeverageChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.stock.is_none()
    }
}
