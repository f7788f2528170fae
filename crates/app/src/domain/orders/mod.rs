//! Orders & Checkout

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;
pub mod state;

pub use errors::CheckoutServiceError;
pub use service::*;
pub use state::CheckoutState;
