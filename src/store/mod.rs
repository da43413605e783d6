pub mod json_store;
pub mod schema;
pub mod starter;

pub use json_store::{JsonStore, StoreError};
