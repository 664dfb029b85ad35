use serde::Deserialize;

use crate::money::Money;

#[derive(Debug, Deserialize)]
pub struct CreateBeverageRequest {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
}
