pub mod balances;
pub mod health;
