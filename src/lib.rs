pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod parsers;
pub mod service;
pub mod storage;
pub mod utils;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::service::PriceMonitor;
