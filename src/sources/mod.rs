//! Configuration source implementations.

mod config_source;
mod dotenv;
mod env;

pub use config_source::ConfigSource;
pub use dotenv::DotenvSource;
pub use env::EnvSource;
