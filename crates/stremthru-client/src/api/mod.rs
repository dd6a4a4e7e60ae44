//! API endpoint implementations.

mod health;
mod store;

pub use health::HealthApi;
pub use store::{ListMagnetsParams, StoreApi};
