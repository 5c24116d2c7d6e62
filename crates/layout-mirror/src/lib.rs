//! # layout-mirror
//!
//! Best-effort replication of workspace layout snapshots to a remote HTTP
//! endpoint.
//!
//! The local store is the source of truth for a saved layout. This crate only
//! pushes a copy of the same JSON body to a write-only endpoint and reports
//! how that went; callers treat every [`MirrorError`] as a soft failure.
//!
//! ## Example
//!
//! ```rust,ignore
//! use layout_mirror::{MirrorClient, DEFAULT_TIMEOUT};
//!
//! let client = MirrorClient::new("http://localhost:3000/api/save-layout", DEFAULT_TIMEOUT)?;
//! client.push(snapshot_json).await?;
//! ```

#![warn(missing_docs)]

mod client;
mod error;

pub use client::{map_status, MirrorClient, DEFAULT_TIMEOUT};
pub use error::MirrorError;
