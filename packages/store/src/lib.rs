//! # Client-side durable storage for Yorumator frontends
//!
//! Every frontend keeps a handful of string values across restarts (the access
//! and refresh tokens). This crate defines the [`KeyValueStore`] seam those
//! values go through and one implementation per platform:
//!
//! | Store | Platform | Backing |
//! |-------|----------|---------|
//! | [`MemoryStore`] | tests, ephemeral sessions | `HashMap` behind a mutex |
//! | [`FileStore`] | desktop, mobile, CLI | one file per key under a base directory |
//! | [`IdbStore`] | web (`wasm32` + `web` feature) | a single IndexedDB object store |
//!
//! It also owns [`ClientConfig`], the TOML file that tells a frontend where the
//! backend lives and where to keep its data.

pub mod config;
pub mod kv;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod idb;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use idb::IdbStore;

pub use config::ClientConfig;
pub use kv::{KeyValueStore, StoreError};
