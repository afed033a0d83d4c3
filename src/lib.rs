//! Library entry point for the vst3-list CLI.

pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod path;
pub mod report;
pub mod scanner;
