//! The application boundary driven by the consensus engine.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ballot_ledger::{QueryResponse, StateMachine, ValidationContext};
use ballot_manifest::{DirManifestStore, ManifestSource};
use ballot_store::{AppInfo, KvStore};
use ballot_store_lmdb::LmdbEnvironment;
use ballot_types::{Rejection, ResponseCode};

use crate::{NodeConfig, NodeError};

/// Result of an admission check or a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResponse {
    pub code: ResponseCode,
    /// Reason for a rejection; empty on success.
    pub log: String,
}

impl TxResponse {
    fn ok() -> Self {
        Self {
            code: ResponseCode::Ok,
            log: String::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

impl From<Rejection> for TxResponse {
    fn from(rejection: Rejection) -> Self {
        Self {
            code: rejection.code,
            log: rejection.reason,
        }
    }
}

/// The ballot application.
pub struct BallotApp<S, M> {
    machine: RwLock<StateMachine<S, M>>,
}

/// The production pairing: LMDB entities, manifests from a directory.
pub type LmdbBallotApp = BallotApp<LmdbEnvironment, DirManifestStore>;

impl LmdbBallotApp {
    /// Open the store and manifest directory named by `config`.
    pub fn open(config: &NodeConfig) -> Result<Self, NodeError> {
        let authority = config.authority()?;
        let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())?;
        let manifests = DirManifestStore::new(&config.manifest_dir);
        tracing::info!(
            data_dir = %config.data_dir.display(),
            manifest_dir = %config.manifest_dir.display(),
            authority = %authority,
            "ballot app opened"
        );
        Ok(Self::new(
            ValidationContext::new(authority.to_hex()),
            env,
            manifests,
        ))
    }
}

impl<S: KvStore, M: ManifestSource> BallotApp<S, M> {
    pub fn new(ctx: ValidationContext, store: S, manifests: M) -> Self {
        Self {
            machine: RwLock::new(StateMachine::new(ctx, store, manifests)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StateMachine<S, M>>, NodeError> {
        self.machine.read().map_err(|_| NodeError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StateMachine<S, M>>, NodeError> {
        self.machine.write().map_err(|_| NodeError::LockPoisoned)
    }

    /// Decode, verify and validate `tx` against committed state. Never writes.
    pub fn admission_check(&self, tx: &[u8]) -> TxResponse {
        let machine = match self.read() {
            Ok(machine) => machine,
            Err(e) => return Rejection::server(e.to_string()).into(),
        };
        match machine.check(tx) {
            Ok(_) => TxResponse::ok(),
            Err(rejection) => rejection.into(),
        }
    }

    /// Validate `tx` again and, if accepted, apply it. Commits are
    /// serialised; call in the order the consensus engine delivers them.
    pub fn commit(&self, tx: &[u8]) -> TxResponse {
        let machine = match self.write() {
            Ok(machine) => machine,
            Err(e) => return Rejection::server(e.to_string()).into(),
        };
        match machine.deliver(tx) {
            Ok(_) => TxResponse::ok(),
            Err(rejection) => rejection.into(),
        }
    }

    /// Answer a read-only query against the last committed state.
    pub fn query(&self, path: &str, params: &[u8]) -> QueryResponse {
        match self.read() {
            Ok(machine) => machine.query(path, params),
            Err(e) => QueryResponse {
                code: ResponseCode::ServerError,
                value: Vec::new(),
                log: e.to_string(),
            },
        }
    }

    /// Last persisted application info.
    pub fn info(&self) -> Result<AppInfo, NodeError> {
        Ok(self.read()?.info()?)
    }

    /// Close the current block.
    pub fn finalize_block(&self) -> Result<AppInfo, NodeError> {
        Ok(self.write()?.finalize_block()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_crypto::keypair_from_seed;
    use ballot_ledger::{ElectionCreate, Envelope, Payload};
    use ballot_nullables::{NullManifestStore, NullStore};

    fn app() -> (BallotApp<NullStore, NullManifestStore>, Vec<u8>) {
        let authority = keypair_from_seed(&[1; 32]);
        let tx = Envelope::sign(
            Payload::Election(ElectionCreate {
                id: "e1".into(),
                from: authority.public.to_hex(),
                voters: vec![],
            }),
            &authority.private,
        )
        .to_bytes();
        let app = BallotApp::new(
            ValidationContext::new(authority.public.to_hex()),
            NullStore::new(),
            NullManifestStore::new(),
        );
        (app, tx)
    }

    #[test]
    fn admission_then_commit() {
        let (app, tx) = app();
        assert!(app.admission_check(&tx).is_ok());
        assert!(app.commit(&tx).is_ok());
        let again = app.admission_check(&tx);
        assert_eq!(again.code, ResponseCode::Unauthorized);
        assert!(!again.log.is_empty());
    }

    #[test]
    fn malformed_tx_is_encoding_error() {
        let (app, _) = app();
        assert_eq!(app.commit(b"{}").code, ResponseCode::EncodingError);
        assert_eq!(app.info().unwrap(), AppInfo::default());
    }

    #[test]
    fn finalize_block_is_reported_by_info() {
        let (app, tx) = app();
        app.commit(&tx);
        let info = app.finalize_block().unwrap();
        assert_eq!(info.height, 1);
        assert_eq!(info.size, 1);
        assert_eq!(app.info().unwrap(), info);
    }

    #[test]
    fn lmdb_app_requires_authority() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            data_dir: dir.path().join("data"),
            ..NodeConfig::default()
        };
        assert!(matches!(
            LmdbBallotApp::open(&config),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn lmdb_open_failure_is_lmdb_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let config = NodeConfig {
            data_dir: blocker,
            authority_key: keypair_from_seed(&[1; 32]).public.to_hex(),
            ..NodeConfig::default()
        };
        assert!(matches!(
            LmdbBallotApp::open(&config),
            Err(NodeError::Lmdb(_))
        ));
    }
}
