pub mod assessment;
pub mod returns;
pub mod session;
pub mod config;
pub mod error;
pub mod utils;

pub use error::{Result, ReturnError};
pub use config::Config;
