pub mod client;
pub mod config;
pub mod form;
pub mod models;
pub mod render;
pub mod session;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;
