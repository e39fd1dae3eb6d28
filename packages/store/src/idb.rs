//! # IndexedDB key-value store: browser-side persistence
//!
//! [`IdbStore`] is the [`KeyValueStore`] implementation used on the **web
//! platform**. It keeps the session tokens in the browser's IndexedDB via the
//! [`rexie`] crate so a reload does not sign the user out.
//!
//! ## Database schema
//!
//! A single IndexedDB database named `"yorumator"` (version 1) with one object store:
//!
//! | IndexedDB store | Key | Value |
//! |-----------------|-----|-------|
//! | `"kv"` | storage key (e.g. `"userToken"`) | string (serialised via `serde_wasm_bindgen`) |
//!
//! ## Connection management
//!
//! `IdbStore` opens a fresh [`Rexie`] connection on every operation: `Rexie`
//! does not implement `Clone`, and the browser caches IndexedDB connections.

use rexie::{ObjectStore as RexieObjectStore, Rexie, TransactionMode};
use wasm_bindgen::JsValue;

use crate::kv::{KeyValueStore, StoreError};

const DB_NAME: &str = "yorumator";
const DB_VERSION: u32 = 1;
const KV_STORE: &str = "kv";

/// IndexedDB-backed KeyValueStore for the web platform.
#[derive(Clone, Default)]
pub struct IdbStore;

impl IdbStore {
    pub fn new() -> Self {
        Self
    }

    async fn open_db(&self) -> Result<Rexie, StoreError> {
        Rexie::builder(DB_NAME)
            .version(DB_VERSION)
            .add_object_store(RexieObjectStore::new(KV_STORE))
            .build()
            .await
            .map_err(backend)
    }
}

fn backend(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl KeyValueStore for IdbStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[KV_STORE], TransactionMode::ReadOnly)
            .map_err(backend)?;
        let store = tx.store(KV_STORE).map_err(backend)?;

        let Some(js_val) = store.get(JsValue::from_str(key)).await.map_err(backend)? else {
            return Ok(None);
        };
        let value: String = serde_wasm_bindgen::from_value(js_val).map_err(backend)?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[KV_STORE], TransactionMode::ReadWrite)
            .map_err(backend)?;
        let store = tx.store(KV_STORE).map_err(backend)?;

        let js_key = JsValue::from_str(key);
        let js_value = serde_wasm_bindgen::to_value(value).map_err(backend)?;
        store.put(&js_value, Some(&js_key)).await.map_err(backend)?;
        tx.done().await.map_err(backend)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[KV_STORE], TransactionMode::ReadWrite)
            .map_err(backend)?;
        let store = tx.store(KV_STORE).map_err(backend)?;

        store.delete(JsValue::from_str(key)).await.map_err(backend)?;
        tx.done().await.map_err(backend)?;
        Ok(())
    }
}
