//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each key
//! as its own file. It is used on desktop, mobile and the CLI so a signed-in
//! session survives app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── userToken        # access token
//! └── refreshToken     # refresh token
//! ```
//!
//! ## Platform data directories
//!
//! Frontends derive `base_dir` from `dirs::data_dir()`:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/yorumator/` |
//! | Linux | `~/.local/share/yorumator/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\yorumator\` |
//! | Android | App-internal storage (via `dirs`) |
//!
//! On unix each file is readable by its owner only (`0600`).

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::kv::{KeyValueStore, StoreError};

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers; strip separators so a key can never escape the base.
        let name: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.base.join(name)
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base)?;
        write_private(&self.key_path(key), value)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_private(path: &Path, value: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten files left by older versions.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(value.as_bytes())
}
