pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod handlers;
pub mod session;
pub mod srs;

#[cfg(test)]
pub mod testing;
