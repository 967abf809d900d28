//! Domain models for the resource allocation dashboard.
//!
//! This module contains the records served by the external APIs, the
//! pagination and formatting rules shared by the views, and configuration.

/// Resource requests, their lines and assignments.
pub mod request;

/// Employees and their skills.
pub mod employee;

/// Match descriptions and AI match results.
pub mod matching;

/// Pagination windows and page bookkeeping.
pub mod pagination;

/// Display formatting for dates and scores.
pub mod format;

/// Configuration file and environment overrides.
pub mod config;
pub use config::Config;

mod wire;
