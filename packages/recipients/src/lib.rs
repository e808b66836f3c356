// ABOUTME: Recipient registration and the (id, name) identity check
// ABOUTME: Recipients are patients who may later submit blood requests

pub mod storage;
pub mod types;

pub use storage::RecipientStorage;
pub use types::{Recipient, RecipientCreateInput, RecipientError};
