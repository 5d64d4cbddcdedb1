pub mod error;
pub mod http;
pub mod json;
pub mod maven;
pub mod minecraft;
pub mod util;

pub use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;
