// src/lib.rs

pub mod api;
pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod utils;
pub mod view_models;

pub use errors::{Result, WalletError};
