//! Cart handlers.

pub(crate) mod add;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod remove_by_product;
pub(crate) mod update;
