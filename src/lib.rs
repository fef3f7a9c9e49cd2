pub mod config;
pub mod error;
pub mod generation;
pub mod provider;
pub mod server;

pub use error::{Error, Result};
