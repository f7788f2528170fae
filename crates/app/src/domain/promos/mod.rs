//! Promos

pub mod discount;
pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use discount::Discount;
pub use errors::PromosServiceError;
pub(crate) use repository::PgPromosRepository;
pub use service::*;
