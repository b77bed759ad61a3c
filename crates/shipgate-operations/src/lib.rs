pub mod concurrency;
mod error;
pub mod operations;
pub mod providers;
pub mod traits;

#[cfg(test)]
pub mod mocks;

pub use error::{ActionError, FetchError, OperationError, Result};
