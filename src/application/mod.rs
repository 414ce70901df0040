pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
