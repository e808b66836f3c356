// ABOUTME: Blood request submission and admin resolution
// ABOUTME: Approval deducts stock atomically; resolved requests are retained

pub mod storage;
pub mod types;

pub use storage::RequestStorage;
pub use types::{
    BloodRequest, RequestCreateInput, RequestError, RequestStatus, ResolveAction,
};
