//! pg-overlay - turns the geometry column of a PostGIS query into a styled
//! display overlay.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod render;
