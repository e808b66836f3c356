// ABOUTME: Blood stock ledger keeping one non-negative counter per group
// ABOUTME: Provides clamped admin updates and the checked approval deduction

pub mod ledger;
pub mod types;

pub use ledger::{deduct_checked, StockLedger};
pub use types::{BloodStock, StockError, StockOperation};
