pub use config::*;
pub use credentials::Credentials;

pub mod config;
pub mod credentials;
