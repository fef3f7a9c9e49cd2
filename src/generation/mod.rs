mod error;
pub mod normalizer;
mod service;
mod types;

pub use error::*;
pub use service::GenerationService;
pub use types::*;
