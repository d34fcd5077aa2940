//! Schema version bookkeeping in the `meta` database.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use crate::LmdbError;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Read the stored schema version; `0` means the database was never initialised.
pub fn schema_version(db: &Database<Bytes, Bytes>, rtxn: &RoTxn) -> Result<u32, LmdbError> {
    match db.get(rtxn, SCHEMA_VERSION_KEY)? {
        Some(bytes) => {
            let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                LmdbError::Meta("schema_version has unexpected byte length".to_string())
            })?;
            Ok(u32::from_le_bytes(arr))
        }
        None => Ok(0),
    }
}

pub fn set_schema_version(
    db: &Database<Bytes, Bytes>,
    wtxn: &mut RwTxn,
    version: u32,
) -> Result<(), LmdbError> {
    db.put(wtxn, SCHEMA_VERSION_KEY, &version.to_le_bytes())?;
    Ok(())
}
