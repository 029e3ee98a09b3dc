//! drive_hierarchy - Export a Google Drive folder tree as JSON.
//!
//! This library provides functionality to:
//! - Authenticate against the Drive API (service account or installed app)
//! - Walk a folder tree depth-first, one listing per folder
//! - Sort every level by natural name order
//! - Write the tree as a nested JSON document
//!
//! # Example
//!
//! ```no_run
//! use drive_hierarchy::{build, sort, write_hierarchy, Authenticator, DriveClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_service_account_file(
//!         "service-account.json",
//!         drive_hierarchy::config::DEFAULT_SCOPE,
//!     )?;
//!     let client = DriveClient::new(auth);
//!
//!     let mut root = build(&client, "root", "My Drive").await?;
//!     sort(&mut root);
//!     write_hierarchy("drive_hierarchy.json", &root, false)?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod folder_ref;
pub mod hierarchy;
pub mod installed_flow;
pub mod logging;
pub mod models;
pub mod natural;
pub mod output;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::DriveClient;
pub use config::Config;
pub use error::{DriveError, Result};
pub use folder_ref::parse_folder_id;
pub use hierarchy::{build, expand, sort, ChildEntry, DirectoryService, FileRef, Node};
pub use output::{read_hierarchy, write_hierarchy};
