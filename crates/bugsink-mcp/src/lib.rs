//! MCP server for the Bugsink error tracker.
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! the Bugsink canonical API to AI assistants as a set of tools. Every tool
//! call is one authenticated request, rendered as plain text.
//!
//! # Architecture
//!
//! The server uses the `rmcp` crate for MCP protocol handling. Tools hold an
//! `Arc<dyn BugsinkApi>` from the `bugsink` crate, so tests can substitute a
//! fake API. Rendering lives in [`format`] and is independent of any I/O.
//!
//! # Tools
//!
//! ## Connectivity
//! - `test_connection` - Check that the server is reachable
//!
//! ## Projects and Teams
//! - `list_projects`, `get_project`, `create_project`, `update_project`
//! - `list_teams`, `get_team`, `create_team`, `update_team`
//!
//! ## Issues and Events
//! - `list_issues` - Issues of a project, with status/sort filters
//! - `get_issue` - One issue with its derived status
//! - `list_events` - Occurrences of an issue
//! - `get_event` - One event with stacktrace, tags and contexts
//! - `get_stacktrace` - The server-rendered stacktrace text
//!
//! ## Releases
//! - `list_releases`, `get_release`, `create_release`

#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod models;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::BugsinkMcpServer;
