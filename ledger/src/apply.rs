//! Commit applier: turns an admitted transaction into staged writes.

use ballot_store::{ElectionRecord, EntityStore, KvStore, PollRecord, WriteBatch};

use crate::{Admitted, LedgerError, ValidationContext};

/// Stage the writes for `admitted` into `batch`. Nothing reaches the store
/// until the batch is committed.
///
/// Returns the identifier of the entity created or updated.
pub fn apply<S: KvStore>(
    ctx: &ValidationContext,
    store: &EntityStore<S>,
    batch: &mut WriteBatch,
    admitted: Admitted,
) -> Result<String, LedgerError> {
    match admitted {
        Admitted::Election(p) => {
            let record = ElectionRecord {
                id: p.id,
                authority_key: ctx.authority_key.clone(),
                voters: p.voters.into_iter().collect(),
            };
            store.stage_election(batch, &record)?;
            Ok(record.id)
        }
        Admitted::Poll { payload, manifest } => {
            let record = PollRecord {
                hash: payload.poll_hash,
                election_id: payload.election_id,
                description: manifest.description,
                choices: manifest.choices.into_keys().map(|label| (label, 0)).collect(),
                voted_already: Vec::new(),
            };
            store.stage_poll(batch, &record)?;
            Ok(record.hash)
        }
        Admitted::Vote { payload, mut poll } => {
            poll.record_vote(&payload.from, &payload.choice);
            store.stage_vote(batch, &payload.from, &poll)?;
            Ok(poll.hash)
        }
    }
}
