//! Store configuration.
//!
//! The backend is always selected and injected by the caller; nothing in
//! the library reads the environment behind your back. [`Config::from_env`]
//! exists for callers that want environment-driven selection at startup,
//! but it has to be called explicitly. [`AnyStore::open`] turns a config
//! into a running store.
//!
//! [`AnyStore::open`]: crate::store::AnyStore::open

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Which storage backend a store should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Durable redb store at the given path.
    Redb(PathBuf),
    /// Volatile in-memory store.
    Memory,
    /// In-memory store snapshotted to a JSON file at the given path.
    File(PathBuf),
}

/// Configuration options for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The backend to open.
    pub backend: Backend,
    /// Whether a missing path-based store is created on open.
    ///
    /// Defaults to `true`. When `false`, opening a path-based backend whose
    /// file does not exist fails with [`Error::Open`] instead of starting
    /// empty. Ignored by the volatile backend.
    pub create_if_missing: bool,
}

impl Config {
    /// Configuration for a durable redb store.
    #[must_use]
    pub fn redb(path: impl Into<PathBuf>) -> Self {
        Self { backend: Backend::Redb(path.into()), create_if_missing: true }
    }

    /// Configuration for a volatile in-memory store.
    #[must_use]
    pub const fn memory() -> Self {
        Self { backend: Backend::Memory, create_if_missing: true }
    }

    /// Configuration for a file-snapshotted in-memory store.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { backend: Backend::File(path.into()), create_if_missing: true }
    }

    /// Set whether a missing path-based store is created on open.
    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Read the configuration from the environment.
    ///
    /// `LODGEDB_BACKEND` selects the backend (`redb`, `memory`, or `file`);
    /// `LODGEDB_PATH` supplies the path for the path-based backends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the backend name is unknown or a required
    /// path is missing.
    pub fn from_env() -> Result<Self> {
        let backend = std::env::var("LODGEDB_BACKEND").unwrap_or_else(|_| "memory".to_string());
        let path = std::env::var("LODGEDB_PATH").ok();

        match backend.as_str() {
            "memory" => Ok(Self::memory()),
            "redb" => {
                let path = path
                    .ok_or_else(|| Error::Open("LODGEDB_PATH is required for redb".to_string()))?;
                Ok(Self::redb(path))
            }
            "file" => {
                let path = path
                    .ok_or_else(|| Error::Open("LODGEDB_PATH is required for file".to_string()))?;
                Ok(Self::file(path))
            }
            other => Err(Error::Open(format!("unknown backend: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_select_backends() {
        assert_eq!(Config::memory().backend, Backend::Memory);
        assert_eq!(Config::redb("a.redb").backend, Backend::Redb(PathBuf::from("a.redb")));
        assert_eq!(Config::file("a.json").backend, Backend::File(PathBuf::from("a.json")));

        assert!(Config::memory().create_if_missing);
        assert!(!Config::redb("a.redb").create_if_missing(false).create_if_missing);
    }

    // Environment manipulation is process-wide, so every from_env case
    // lives in this one test.
    #[test]
    fn from_env_reads_backend_and_path() {
        std::env::remove_var("LODGEDB_BACKEND");
        std::env::remove_var("LODGEDB_PATH");
        assert_eq!(Config::from_env().expect("default"), Config::memory());

        std::env::set_var("LODGEDB_BACKEND", "redb");
        assert!(matches!(Config::from_env(), Err(Error::Open(_))));

        std::env::set_var("LODGEDB_PATH", "lodge.redb");
        assert_eq!(Config::from_env().expect("redb"), Config::redb("lodge.redb"));

        std::env::set_var("LODGEDB_BACKEND", "file");
        assert_eq!(Config::from_env().expect("file"), Config::file("lodge.redb"));

        std::env::set_var("LODGEDB_BACKEND", "postgres");
        assert!(matches!(Config::from_env(), Err(Error::Open(_))));

        std::env::remove_var("LODGEDB_BACKEND");
        std::env::remove_var("LODGEDB_PATH");
    }
}
