//! RocksDB-backed [`KvStore`].

use std::path::Path;

use anyhow::{Context, Result};
use rocksdb::{DB, IteratorMode, Options};

use crate::storage::KvStore;

pub struct RocksDbStore {
    db: DB,
}

impl RocksDbStore {
    pub fn open(path: &Path) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)
            .with_context(|| format!("open pool db at {}", path.display()))?;
        Ok(Self { db })
    }
}

impl KvStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key).context("db get")?)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.put(key, value).context("db put")
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.db.delete(key).context("db delete")
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut out = Vec::new();
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, rocksdb::Direction::Forward));
        for entry in iter {
            let (key, value) = entry.context("db iterate")?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.to_vec(), value.to_vec()));
        }
        Ok(out)
    }
}
