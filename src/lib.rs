//! tweetscout - Twitter search exposed as an MCP tool
//!
//! This crate provides:
//! - A paginated search client for the RapidAPI Twitter endpoint
//! - A formatter that renders tweets as a markdown report
//! - An MCP server over stdio registering the `searchTwitter` tool

pub mod config;
pub mod error;
pub mod format;
pub mod mcp;
pub mod models;
pub mod search;

pub use config::Config;
pub use error::{Error, Result};
