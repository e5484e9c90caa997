pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod evolution;
pub mod favorites;
pub mod formatters;
pub mod pokemon;
pub mod query;
pub mod routes;
pub mod search;
pub mod species;
pub mod validation;

pub use cache::*;
pub use catalog::*;
pub use client::*;
pub use config::*;
pub use error::*;
pub use evolution::*;
pub use favorites::*;
pub use pokemon::*;
pub use query::*;
pub use validation::*;
