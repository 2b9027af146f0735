//! # Music Library Common Library
//!
//! Shared code for the music library services including:
//! - Bootstrap configuration (TOML + environment)
//! - Tracing subscriber setup
//! - PostgreSQL pool setup and schema bootstrap
//! - `DD.MM.YYYY` date handling
//! - The song info payload exchanged with the lookup service

pub mod config;
pub mod date;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod logging;
pub mod song_info;

pub use error::{Error, Result};
pub use song_info::SongInfo;
