//! connstr CLI - Command-line interface for connection string validation.
//!
//! This crate provides the `connstr` tool for checking, normalizing, and
//! test-connecting document-database connection strings.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
