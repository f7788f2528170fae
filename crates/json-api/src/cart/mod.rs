//! Cart HTTP surface.

pub(crate) mod errors;
pub(crate) mod handlers;
