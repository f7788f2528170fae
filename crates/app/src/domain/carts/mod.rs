//! Carts

pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub(crate) use repositories::{PgCartLinesRepository, PgCartsRepository};
pub use service::*;
