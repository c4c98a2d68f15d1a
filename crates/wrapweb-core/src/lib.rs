pub mod command;
pub mod config;
pub mod error;
pub mod signature;
pub mod sqlite;
pub mod store;
pub mod types;
pub mod updater;
pub mod webhook;

pub use error::{Result, WrapError};
