//! Promo handlers.

pub(crate) mod apply;
