//! Local Library web application: catalog, users and wiki modules on the libris kernel.

pub mod bootstrap;
pub mod modules;
pub mod seed;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
