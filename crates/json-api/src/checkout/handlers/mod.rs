//! Checkout handlers.

pub(crate) mod create;
