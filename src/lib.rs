pub mod app;
pub mod auth;
pub mod beverages;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod money;
pub mod state;
pub mod users;

#[cfg(test)]
mod testing;
