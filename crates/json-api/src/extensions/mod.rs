//! Extension traits

mod depot;
mod session;

pub(crate) use depot::DepotExt as _;
pub(crate) use session::SessionExt as _;
