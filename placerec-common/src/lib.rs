//! # placerec common library
//!
//! Shared code for the placerec service:
//! - Place record model and identity keys
//! - Common error type
//! - TOML configuration loading
//! - SQLite pool initialization and schema

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{identity_key, Place, PlaceListing, RankedPlace, Submission};
