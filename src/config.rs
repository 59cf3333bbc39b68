//! Configuration loader and schema types.
//!
//! The schema lives in `config::schema`, the file/env loader in
//! `config::load`; both are re-exported here.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
