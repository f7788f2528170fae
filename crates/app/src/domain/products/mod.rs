//! Products

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub(crate) use repository::PgProductsRepository;
pub use service::*;
