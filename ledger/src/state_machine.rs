//! Decode → verify → validate → apply, over one entity store.

use ballot_manifest::ManifestSource;
use ballot_store::{AppInfo, EntityStore, KvStore, WriteBatch};
use ballot_types::Rejection;
use tracing::{debug, info};

use crate::{
    apply, verify_envelope, Admitted, Envelope, EnvelopeKind, LedgerError, QueryEngine,
    QueryResponse, ValidationContext, Validator,
};

/// Outcome of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed {
    pub kind: EnvelopeKind,
    /// Election id or poll hash the transaction created or updated.
    pub entity: String,
    /// Application info after this transaction.
    pub app_info: AppInfo,
}

/// The application state machine.
///
/// All methods take `&self`; callers must serialise [`StateMachine::deliver`]
/// and [`StateMachine::finalize_block`] in delivery order.
pub struct StateMachine<S, M> {
    ctx: ValidationContext,
    store: EntityStore<S>,
    manifests: M,
}

impl<S: KvStore, M: ManifestSource> StateMachine<S, M> {
    pub fn new(ctx: ValidationContext, store: S, manifests: M) -> Self {
        Self {
            ctx,
            store: EntityStore::new(store),
            manifests,
        }
    }

    pub fn context(&self) -> &ValidationContext {
        &self.ctx
    }

    pub fn store(&self) -> &EntityStore<S> {
        &self.store
    }

    /// Admission check: decode, verify and validate without writing.
    pub fn check(&self, tx: &[u8]) -> Result<Admitted, Rejection> {
        self.admit(tx).map(|(_, admitted)| admitted)
    }

    fn admit(&self, tx: &[u8]) -> Result<(EnvelopeKind, Admitted), Rejection> {
        let result = Envelope::decode(tx).and_then(|envelope| {
            verify_envelope(&envelope)?;
            let admitted =
                Validator::new(&self.ctx, &self.store, &self.manifests).validate(&envelope.payload)?;
            Ok((envelope.kind(), admitted))
        });
        if let Err(rejection) = &result {
            debug!(code = %rejection.code, reason = %rejection.reason, "transaction rejected");
        }
        result
    }

    /// Commit: re-run the full check against current state, then apply the
    /// transaction and fold it into the app hash in one atomic batch.
    pub fn deliver(&self, tx: &[u8]) -> Result<Committed, Rejection> {
        let (kind, admitted) = self.admit(tx)?;

        let mut batch = WriteBatch::new();
        let entity = apply(&self.ctx, &self.store, &mut batch, admitted)?;

        let mut app_info = self.store.app_info_staged(&batch).map_err(LedgerError::from)?;
        app_info.size += 1;
        app_info.app_hash = ballot_crypto::blake2b_256_multi(&[app_info.app_hash.as_slice(), tx]);
        self.store
            .stage_app_info(&mut batch, &app_info)
            .map_err(LedgerError::from)?;

        self.store.commit(batch).map_err(|e| {
            tracing::error!(%kind, %entity, error = %e, "commit failed");
            LedgerError::from(e)
        })?;

        info!(%kind, %entity, size = app_info.size, "transaction committed");
        Ok(Committed {
            kind,
            entity,
            app_info,
        })
    }

    pub fn query(&self, path: &str, params: &[u8]) -> QueryResponse {
        QueryEngine::new(&self.store).query(path, params)
    }

    /// Close the current block: bump the height and persist.
    pub fn finalize_block(&self) -> Result<AppInfo, LedgerError> {
        let mut app_info = self.store.app_info()?;
        app_info.height += 1;
        let mut batch = WriteBatch::new();
        self.store.stage_app_info(&mut batch, &app_info)?;
        self.store.commit(batch)?;
        debug!(height = app_info.height, "block finalized");
        Ok(app_info)
    }

    pub fn info(&self) -> Result<AppInfo, LedgerError> {
        Ok(self.store.app_info()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElectionCreate, Payload, PollCreate, VoteCast};
    use ballot_crypto::keypair_from_seed;
    use ballot_nullables::{NullManifestStore, NullStore};
    use ballot_types::{KeyPair, ResponseCode};
    use std::sync::Arc;

    struct Harness {
        sm: StateMachine<Arc<NullStore>, Arc<NullManifestStore>>,
        kv: Arc<NullStore>,
        manifests: Arc<NullManifestStore>,
        authority: KeyPair,
    }

    fn harness() -> Harness {
        let authority = keypair_from_seed(&[1; 32]);
        let kv = Arc::new(NullStore::new());
        let manifests = Arc::new(NullManifestStore::new());
        let sm = StateMachine::new(
            ValidationContext::new(authority.public.to_hex()),
            Arc::clone(&kv),
            Arc::clone(&manifests),
        );
        Harness {
            sm,
            kv,
            manifests,
            authority,
        }
    }

    impl Harness {
        fn election_tx(&self, id: &str, voters: &[&KeyPair]) -> Vec<u8> {
            Envelope::sign(
                Payload::Election(ElectionCreate {
                    id: id.into(),
                    from: self.authority.public.to_hex(),
                    voters: voters.iter().map(|kp| kp.public.to_hex()).collect(),
                }),
                &self.authority.private,
            )
            .to_bytes()
        }

        fn poll_tx(&self, hash: &str, election_id: &str) -> Vec<u8> {
            Envelope::sign(
                Payload::Poll(PollCreate {
                    from: self.authority.public.to_hex(),
                    poll_hash: hash.into(),
                    election_id: election_id.into(),
                }),
                &self.authority.private,
            )
            .to_bytes()
        }
    }

    fn vote_tx(voter: &KeyPair, hash: &str, choice: &str) -> Vec<u8> {
        Envelope::sign(
            Payload::Vote(VoteCast {
                from: voter.public.to_hex(),
                poll_hash: hash.into(),
                choice: choice.into(),
            }),
            &voter.private,
        )
        .to_bytes()
    }

    #[test]
    fn check_never_writes() {
        let h = harness();
        let tx = h.election_tx("e1", &[]);
        assert!(h.sm.check(&tx).is_ok());
        assert!(h.sm.check(&tx).is_ok());
        assert!(h.kv.is_empty());
    }

    #[test]
    fn full_flow_updates_app_info() {
        let h = harness();
        let voter = keypair_from_seed(&[2; 32]);
        let hash = h.manifests.add_poll("lunch", &["a", "b"]);

        let c1 = h.sm.deliver(&h.election_tx("e1", &[&voter])).unwrap();
        assert_eq!(c1.kind, EnvelopeKind::Election);
        assert_eq!(c1.entity, "e1");
        let c2 = h.sm.deliver(&h.poll_tx(&hash, "e1")).unwrap();
        assert_eq!(c2.entity, hash);
        let c3 = h.sm.deliver(&vote_tx(&voter, &hash, "a")).unwrap();

        assert_eq!(c3.app_info.size, 3);
        assert_ne!(c3.app_info.app_hash, c2.app_info.app_hash);
        assert_eq!(h.sm.info().unwrap(), c3.app_info);
    }

    #[test]
    fn rejected_commit_leaves_state_untouched() {
        let h = harness();
        h.sm.deliver(&h.election_tx("e1", &[])).unwrap();
        let before = h.kv.dump();

        let err = h.sm.deliver(&h.election_tx("e1", &[])).unwrap_err();
        assert_eq!(err.code, ResponseCode::Unauthorized);
        assert_eq!(h.kv.dump(), before);
    }

    #[test]
    fn app_hash_depends_on_transaction_order() {
        let a = harness();
        let b = harness();
        let e1 = a.election_tx("e1", &[]);
        let e2 = a.election_tx("e2", &[]);

        a.sm.deliver(&e1).unwrap();
        a.sm.deliver(&e2).unwrap();
        b.sm.deliver(&e2).unwrap();
        b.sm.deliver(&e1).unwrap();

        assert_ne!(a.sm.info().unwrap().app_hash, b.sm.info().unwrap().app_hash);
    }

    #[test]
    fn finalize_block_bumps_height_only() {
        let h = harness();
        h.sm.deliver(&h.election_tx("e1", &[])).unwrap();
        let before = h.sm.info().unwrap();
        let after = h.sm.finalize_block().unwrap();
        assert_eq!(after.height, before.height + 1);
        assert_eq!(after.size, before.size);
        assert_eq!(after.app_hash, before.app_hash);
        assert_eq!(h.sm.finalize_block().unwrap().height, 2);
    }

    #[test]
    fn fresh_store_info_is_zero() {
        let h = harness();
        assert_eq!(h.sm.info().unwrap(), AppInfo::default());
    }
}
