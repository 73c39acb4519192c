pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod page;

pub use config::Config;
pub use error::{Error, Result};
