//! Configuration loader and schema types.
//!
//! Settings come from struct defaults, an optional `config.toml` and
//! `CORTEX_FM__*` environment variables, in increasing precedence.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
