//! SQLite connection and the sales record store.

pub mod connection;
pub mod sales;

pub use connection::{connect, initialize_schema};
pub use sales::SalesStore;
