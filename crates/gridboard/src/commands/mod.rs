//! Command implementations for the gbd CLI.
//!
//! This module contains all command handler functions, organized by domain:
//! - `layouts` - Catalog listing
//! - `session` - Interactive workspace session
//! - `view` - Standalone render of a detached widget
//! - `config` - Configuration file management
//!
//! Handlers print their own messages and return the process exit code.

pub(crate) mod config;
pub(crate) mod layouts;
pub(crate) mod session;
pub(crate) mod view;

pub(crate) use config::*;
pub(crate) use layouts::*;
pub(crate) use session::*;
pub(crate) use view::*;

use std::sync::Arc;

use gridboard::config::{schema::Config, ConfigError};
use gridboard::persistence::{DisabledMirror, HttpMirror, PersistenceGateway, RemoteMirror};
use kv_store::{FileStore, StoreError};
use layout_mirror::MirrorError;
use thiserror::Error;

/// Failures while wiring the store and mirror from configuration.
#[derive(Debug, Error)]
pub(crate) enum SetupError {
    /// No `[storage] dir` and no platform data directory.
    #[error("no data directory available; set [storage] dir")]
    NoDataDir,

    /// Invalid duration or other value.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store directory could not be opened.
    #[error("cannot open store: {0}")]
    Store(#[from] StoreError),

    /// The mirror client could not be built.
    #[error("cannot set up mirror: {0}")]
    Mirror(#[from] MirrorError),
}

/// File-backed store configured from `[storage]`.
pub(crate) fn open_store(config: &Config) -> Result<Arc<FileStore>, SetupError> {
    let dir = config.storage.resolved_dir().ok_or(SetupError::NoDataDir)?;
    let mut store = FileStore::open(&dir)?.with_capacity(config.storage.capacity_bytes);
    if let Some(ttl) = config.storage.snapshot_ttl()? {
        store = store.with_ttl(ttl);
    }
    tracing::debug!(dir = %dir.display(), "store opened");
    Ok(Arc::new(store))
}

/// Gateway over the configured store and mirror.
pub(crate) fn build_gateway(config: &Config) -> Result<PersistenceGateway, SetupError> {
    let store = open_store(config)?;
    let mirror: Box<dyn RemoteMirror> = if config.mirror.enabled {
        Box::new(HttpMirror::new(&config.mirror.url, config.mirror.timeout()?)?)
    } else {
        Box::new(DisabledMirror::new())
    };
    Ok(PersistenceGateway::new(store, mirror))
}
