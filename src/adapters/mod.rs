// Adapters layer: concrete implementations for external systems (storage, operator input).

pub mod challenge;
pub mod storage;

pub use challenge::{AutoResolver, ConsoleResolver};
pub use storage::LocalStorage;
