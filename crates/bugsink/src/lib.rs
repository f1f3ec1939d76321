//! Bugsink - a typed client for the Bugsink canonical REST API.
//!
//! This crate wraps the `/api/canonical/0` namespace of a Bugsink server:
//! projects, teams, issues, events and releases.
//!
//! # Architecture
//!
//! - [`api::BugsinkApi`] is the object-safe async trait with one method per
//!   remote operation. Code that only needs to *talk* to Bugsink should depend
//!   on the trait so it can be exercised against a fake.
//! - [`client::BugsinkClient`] is the `reqwest`-backed implementation. Every
//!   method issues exactly one HTTP request.
//! - [`domain`] holds the response snapshots and request payloads.
//!
//! # Example
//!
//! ```no_run
//! use bugsink::api::BugsinkApi;
//! use bugsink::client::BugsinkClient;
//! use bugsink::config::ClientConfig;
//!
//! # async fn run() -> bugsink::Result<()> {
//! let config = ClientConfig::new("https://bugsink.example.com", "secret-token")?;
//! let client = BugsinkClient::new(config)?;
//!
//! let projects = client.list_projects().await?;
//! for project in &projects.results {
//!     println!("{} ({})", project.name, project.slug);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;

pub use api::{BugsinkApi, ConnectionReport};
pub use client::BugsinkClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
