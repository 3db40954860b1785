//! Forge account lifecycle library.
//!
//! Account deletion with counter corrections and dependent-record cleanup, profile visibility
//! decisions, repository access filtering, and external identity links.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod services;
