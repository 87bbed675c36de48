pub mod config;
pub mod error;
pub mod http;

pub use config::Config;
pub use error::{Error, Result};
pub use crate::http::{Cookie, CookieSet, RemoveMode};
