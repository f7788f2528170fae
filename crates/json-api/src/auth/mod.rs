//! Bearer-session authentication.

pub(crate) mod middleware;
