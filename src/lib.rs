//! Vidcat library crate
//!
//! This crate provides both a CLI binary and a library API for building,
//! persisting and exporting video file catalogs.

pub mod classify;
pub mod cli;
pub mod config;
pub mod export;
pub mod merge;
pub mod metadata;
pub mod model;
pub mod output;
pub mod portable;
pub mod progress;
pub mod scan_events;
pub mod scanner;
pub mod store;
