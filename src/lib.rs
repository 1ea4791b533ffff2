pub mod cli;
pub mod commands;
pub mod config;
pub mod dates;
pub mod export;
pub mod geography;
pub mod reconcile;
pub mod record;
pub mod render;
pub mod summary;
pub mod tables;
pub mod tree;
pub mod utils;
mod error;

pub use error::{ReportError, Result};
