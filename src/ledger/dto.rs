use serde::Deserialize;

use crate::money::Money;

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Money,
}
