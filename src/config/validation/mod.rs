//! Configuration validation
//!
//! Each configuration section implements [`Validate`]; `Config::validate`
//! runs them all and wraps the first failure in a configuration error.

mod bootstrap_validators;
mod monitoring_validators;
mod server_validators;
#[cfg(test)]
mod tests;
mod trait_def;

pub use trait_def::Validate;
