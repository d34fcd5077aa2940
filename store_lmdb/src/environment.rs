//! LMDB environment setup and the `KvStore` implementation.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use ballot_store::{KvStore, StoreError, WriteBatch};

use crate::meta::{self, CURRENT_SCHEMA_VERSION};
use crate::LmdbError;

const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and its database handles.
///
/// Each [`KvStore::write_batch`] call is one LMDB write transaction, so
/// readers observe either the whole batch or none of it.
pub struct LmdbEnvironment {
    env: Env,
    entities_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an environment at `path`, creating the directory if needed.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // never concurrently mapped with incompatible flags.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let entities_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some("entities"))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("meta"))?;

        let found = meta::schema_version(&meta_db, &wtxn)?;
        if found > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::SchemaVersion {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        if found < CURRENT_SCHEMA_VERSION {
            meta::set_schema_version(&meta_db, &mut wtxn, CURRENT_SCHEMA_VERSION)?;
        }
        wtxn.commit()?;

        tracing::info!(
            path = %path.display(),
            map_size,
            schema_version = CURRENT_SCHEMA_VERSION,
            "opened LMDB environment"
        );

        Ok(Self {
            env,
            entities_db,
            meta_db,
        })
    }

    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        meta::schema_version(&self.meta_db, &rtxn)
    }

    /// Flush to disk.
    pub fn sync(&self) -> Result<(), LmdbError> {
        self.env.force_sync()?;
        Ok(())
    }
}

impl KvStore for LmdbEnvironment {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .entities_db
            .get(&rtxn, key)
            .map_err(LmdbError::from)?
            .map(|v| v.to_vec());
        Ok(value)
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let count = batch.len();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for (key, value) in batch.into_puts() {
            self.entities_db
                .put(&mut wtxn, &key, &value)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(puts = count, "committed write batch");
        Ok(())
    }
}
